//! Results view: read the handoff once, then project on every render.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::Route;
use crate::data_uri::MaterializedImage;
use crate::error::{ImageMatchError, Result};
use crate::handoff::{HandoffStore, KeyValueStore, Session};
use crate::presenter::{self, CategoryFilter, ResultCard, Selection, SortKey};
use crate::response::ImageResult;
use crate::theme::{Theme, ThemeContext};

/// Why the view sent the user back to the submission route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectReason {
    /// Reached without a prior complete submission
    NoActiveSession,
    /// Stored state failed to parse
    MalformedSession(String),
    /// User asked for a new search
    NewSearch,
}

#[derive(Debug)]
pub enum ViewState {
    /// Not mounted yet
    Idle,
    /// Session read, image not yet materialized
    Loading(Session),
    Ready(ReadyResults),
    /// Terminal: navigate to [`ViewState::redirect_route`]
    Redirected(RedirectReason),
}

/// A mounted, displayable result set.
#[derive(Debug)]
pub struct ReadyResults {
    pub query_image: MaterializedImage,
    pub results: Vec<ImageResult>,
    pub selection: Selection,
}

/// Everything a front end needs to draw the results page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsPage {
    pub theme: Theme,
    pub query_mime_type: String,
    pub query_bytes: usize,
    pub category: String,
    pub sort: SortKey,
    pub summary: String,
    pub cards: Vec<ResultCard>,
}

impl ViewState {
    pub fn redirect_route(&self) -> Option<Route> {
        match self {
            Self::Redirected(_) => Some(Route::Submission),
            _ => None,
        }
    }
}

/// One instance of the results view.
///
/// `Idle → Loading → Ready`, or `→ Redirected` when there is no usable session.
#[derive(Debug)]
pub struct ResultsView {
    state: ViewState,
}

impl Default for ResultsView {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsView {
    pub fn new() -> Self {
        Self {
            state: ViewState::Idle,
        }
    }

    /// Mount and materialize in one go.
    pub fn open<D: KeyValueStore, T: KeyValueStore>(store: &HandoffStore<D, T>) -> Self {
        let mut view = Self::new();
        view.mount(store);
        view.materialize();
        view
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ViewState::Ready(_))
    }

    /// Read the handoff store. Only the first call reads; later calls are no-ops.
    pub fn mount<D: KeyValueStore, T: KeyValueStore>(
        &mut self,
        store: &HandoffStore<D, T>,
    ) -> &ViewState {
        if !matches!(self.state, ViewState::Idle) {
            debug!("Results view already mounted");
            return &self.state;
        }

        self.state = match store.load_session() {
            Ok(session) => {
                debug!(results = session.response.len(), "Results view loading");
                ViewState::Loading(session)
            }
            Err(e) => redirect(e),
        };
        &self.state
    }

    /// Decode the stored image for display. No network call happens here.
    pub fn materialize(&mut self) -> &ViewState {
        let state = std::mem::replace(&mut self.state, ViewState::Idle);
        self.state = match state {
            ViewState::Loading(session) => match session.image.decode() {
                Ok(query_image) => {
                    info!(
                        results = session.response.len(),
                        query_bytes = query_image.bytes.len(),
                        "Results view ready"
                    );
                    ViewState::Ready(ReadyResults {
                        query_image,
                        results: session.response.results,
                        selection: Selection::default(),
                    })
                }
                Err(e) => redirect(e),
            },
            other => other,
        };
        &self.state
    }

    pub fn set_category(&mut self, category: impl Into<CategoryFilter>) {
        if let ViewState::Ready(ready) = &mut self.state {
            ready.selection.category = category.into();
        }
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if let ViewState::Ready(ready) = &mut self.state {
            ready.selection.sort = sort;
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        match &self.state {
            ViewState::Ready(ready) => Some(&ready.selection),
            _ => None,
        }
    }

    /// The projected list for the current selection. Empty unless ready.
    pub fn display(&self) -> Vec<&ImageResult> {
        match &self.state {
            ViewState::Ready(ready) => presenter::project(&ready.results, &ready.selection),
            _ => Vec::new(),
        }
    }

    pub fn render(&self, theme: &ThemeContext) -> Option<ResultsPage> {
        let ViewState::Ready(ready) = &self.state else {
            return None;
        };
        let display = presenter::project(&ready.results, &ready.selection);

        Some(ResultsPage {
            theme: theme.theme(),
            query_mime_type: ready.query_image.mime_type.clone(),
            query_bytes: ready.query_image.bytes.len(),
            category: ready.selection.category.to_string(),
            sort: ready.selection.sort,
            summary: presenter::summary(display.len(), &ready.selection.category),
            cards: presenter::cards(&display),
        })
    }

    /// Clear the session and leave for the submission route.
    pub fn new_search<D: KeyValueStore, T: KeyValueStore>(
        &mut self,
        store: &HandoffStore<D, T>,
    ) -> Result<Route> {
        store.clear()?;
        self.state = ViewState::Redirected(RedirectReason::NewSearch);
        Ok(Route::Submission)
    }
}

fn redirect(err: ImageMatchError) -> ViewState {
    let reason = match err {
        ImageMatchError::NoActiveSession => RedirectReason::NoActiveSession,
        other => RedirectReason::MalformedSession(other.to_string()),
    };
    warn!(reason = ?reason, route = %Route::Submission, "Redirecting from results view");
    ViewState::Redirected(reason)
}
