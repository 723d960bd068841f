//! Search command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use imagematch_core::{
    HttpSearchClient, MockSearchService, Route, SearchService, SubmissionView, UploadCandidate,
};
use tracing::{debug, info, warn};

use crate::utils::{client_config, session_store, show_results, CliStore};
use crate::{GlobalArgs, ViewArgs};

/// Execute the search command: submit, then show the results view.
pub async fn execute(global: &GlobalArgs, file: PathBuf, mock: bool, view: ViewArgs) -> Result<()> {
    let bytes =
        std::fs::read(&file).with_context(|| format!("Failed to read file: {}", file.display()))?;
    info!(path = %file.display(), bytes = bytes.len(), "Read file");

    let candidate = UploadCandidate::from_path_bytes(&file, bytes);
    debug!(mime = %candidate.declared_mime_type, "Declared MIME type");

    let store = session_store(global);
    let route = if mock {
        warn!("Using MOCK similarity service (canned results)");
        if !global.quiet {
            eprintln!("{}", "Using MOCK similarity service (canned results)".yellow());
        }
        submit(&MockSearchService::default(), &store, candidate).await?
    } else {
        let client = HttpSearchClient::new(client_config(global)?)
            .context("Failed to create similarity service client")?;
        submit(&client, &store, candidate).await?
    };

    debug!(route = %route, "Navigating");
    show_results(global, &view, &store)
}

async fn submit<S: SearchService>(
    service: &S,
    store: &CliStore,
    candidate: UploadCandidate,
) -> Result<Route> {
    let mut view = SubmissionView::new(service, store);
    match view.submit(candidate).await {
        Ok(route) => Ok(route),
        Err(e) => {
            if let Some(notification) = view.notification() {
                eprintln!("{}", notification.yellow());
            }
            Err(e).context("Search failed")
        }
    }
}
