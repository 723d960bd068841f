//! The two views of the search flow and the routes between them.
//!
//! Navigating from one view to the other is the only way state moves between
//! them, through the [`HandoffStore`](crate::handoff::HandoffStore).

mod results;
#[cfg(feature = "network")]
mod submission;

pub use results::{ReadyResults, RedirectReason, ResultsPage, ResultsView, ViewState};
#[cfg(feature = "network")]
pub use submission::SubmissionView;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Upload form
    Submission,
    /// Result grid
    Results,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Submission => "/",
            Self::Results => "/search",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
