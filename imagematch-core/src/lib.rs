//! ImageMatch Core - search-session pipeline for a visual similarity client
//!
//! This crate covers everything between "the user picked a file" and "the
//! result grid is on screen". It does not do the similarity matching itself,
//! which is left to the external service.
//!
//! # Features
//!
//! - Pre-flight validation of uploads (declared image type, 10 MiB ceiling)
//! - Multipart transmission to `POST /api/search` (`network` feature)
//! - Two-slot session handoff across page navigations
//! - Pure filter/sort projection of the returned matches
//! - Explicit dark/light theme context
//!
//! # Example
//!
//! ```no_run
//! use imagematch_core::{
//!     ClientConfig, HandoffStore, HttpSearchClient, ResultsView, SubmissionView, ThemeContext,
//!     UploadCandidate,
//! };
//!
//! # async fn example() -> imagematch_core::Result<()> {
//! let theme = ThemeContext::default();
//! let store = HandoffStore::in_memory();
//! let service = HttpSearchClient::new(ClientConfig::from_env())?;
//!
//! let bytes = std::fs::read("beach.jpg").unwrap_or_default();
//! let mut submission = SubmissionView::new(&service, &store);
//! submission.submit(UploadCandidate::new(bytes, "image/jpeg")).await?;
//!
//! // ...navigation happens here...
//! let results = ResultsView::open(&store);
//! if let Some(page) = results.render(&theme) {
//!     println!("{}", page.summary);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data_uri;
pub mod error;
pub mod handoff;
pub mod presenter;
pub mod response;
pub mod theme;
#[cfg(feature = "network")]
pub mod transmitter;
pub mod validator;
pub mod view;

// Re-export main types for convenience
pub use config::{ClientConfig, DEFAULT_SERVICE_URL, SERVICE_URL_ENV};
pub use data_uri::{DataUri, MaterializedImage};
pub use error::{ImageMatchError, Result, MAX_UPLOAD_BYTES};
pub use handoff::{
    FileStore, HandoffStore, KeyValueStore, MemoryStore, Session, IMAGE_KEY, RESPONSE_KEY,
};
pub use presenter::{
    category_options, project, CategoryFilter, ResultCard, Selection, SortKey, KNOWN_CATEGORIES,
};
pub use response::{EmbedSummary, ImageResult, SearchResponse};
pub use theme::{Palette, Theme, ThemeContext};
pub use validator::{validate, AcceptedFile, UploadCandidate};
pub use view::{RedirectReason, ResultsPage, ResultsView, Route, ViewState};

// Network-dependent exports (not available in Wasm)
#[cfg(feature = "network")]
pub use transmitter::{HttpSearchClient, MockSearchService, SearchService};
#[cfg(feature = "network")]
pub use view::SubmissionView;

#[cfg(all(test, feature = "network"))]
mod tests {
    use super::*;

    /// Integration test: submit a JPEG, hand off, render one card.
    #[tokio::test]
    async fn test_full_search_workflow() {
        let theme = ThemeContext::default();
        let store = HandoffStore::in_memory();
        let service = MockSearchService::new(
            SearchResponse::from_json(r#"{"results":[{"id":1,"score":97,"category":"nature"}]}"#)
                .expect("Failed to parse canned response"),
        );

        // Step 1: Submission view
        let mut submission = SubmissionView::new(&service, &store);
        let route = submission
            .submit(UploadCandidate::new(vec![0xAB; 2_000_000], "image/jpeg"))
            .await
            .expect("Submission failed");
        assert_eq!(route, Route::Results);

        // Step 2: Results view, mounted after navigation
        let results = ResultsView::open(&store);
        let page = results.render(&theme).expect("Results view not ready");

        assert_eq!(page.cards.len(), 1);
        assert_eq!(page.cards[0].badge, "97% match");
        assert_eq!(page.cards[0].category, "nature");
        assert_eq!(page.query_bytes, 2_000_000);
    }
}
