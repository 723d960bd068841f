//! Results command implementation.

use anyhow::Result;

use crate::utils::{session_store, show_results};
use crate::{GlobalArgs, ViewArgs};

/// Execute the results command: remount the results view from the stored session.
pub fn execute(global: &GlobalArgs, view: ViewArgs) -> Result<()> {
    let store = session_store(global);
    show_results(global, &view, &store)
}
