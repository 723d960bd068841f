//! Reset command implementation ("new search").

use anyhow::{Context, Result};
use colored::Colorize;
use imagematch_core::ResultsView;
use tracing::info;

use crate::utils::session_store;
use crate::GlobalArgs;

/// Execute the reset command.
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let store = session_store(global);
    let route = ResultsView::new()
        .new_search(&store)
        .context("Failed to clear search session")?;
    info!(route = %route, "Session cleared");

    if !global.quiet {
        println!("{}", "Search session cleared.".green());
    }
    Ok(())
}
