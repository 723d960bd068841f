//! Index command implementation.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use imagematch_core::HttpSearchClient;
use tracing::info;

use crate::utils::client_config;
use crate::GlobalArgs;

/// Execute the index command: ask the service to embed its image folder.
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let client = HttpSearchClient::new(client_config(global)?)
        .context("Failed to create similarity service client")?;
    let summary = client
        .trigger_indexing()
        .await
        .context("Indexing request failed")?;

    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        "Indexing finished"
    );

    if !summary.success {
        bail!("Indexing reported failure: {}", summary.message);
    }

    if !global.quiet {
        println!();
        println!("{}", summary.message.green().bold());
        println!("   {} {}", "Processed:".dimmed(), summary.processed);
        println!("   {} {}", "Skipped:".dimmed(), summary.skipped);
    }
    Ok(())
}
