//! Submission view: validate, transmit, hand off.

use tracing::{info, warn};

use super::Route;
use crate::data_uri::DataUri;
use crate::error::Result;
use crate::handoff::{HandoffStore, KeyValueStore};
use crate::transmitter::SearchService;
use crate::validator::{validate, UploadCandidate};

/// Drives one upload from file selection to the results route.
///
/// `submit` takes `&mut self`, so a view runs at most one submission at a time.
pub struct SubmissionView<'a, S, D, T> {
    service: &'a S,
    store: &'a HandoffStore<D, T>,
    notification: Option<String>,
}

impl<'a, S, D, T> SubmissionView<'a, S, D, T>
where
    S: SearchService,
    D: KeyValueStore,
    T: KeyValueStore,
{
    pub fn new(service: &'a S, store: &'a HandoffStore<D, T>) -> Self {
        Self {
            service,
            store,
            notification: None,
        }
    }

    /// Run the whole submission.
    ///
    /// On success both handoff slots are written and the caller navigates to
    /// [`Route::Results`]. On failure nothing is written, the user stays on this
    /// view and [`notification`](Self::notification) holds the message to show.
    pub async fn submit(&mut self, candidate: UploadCandidate) -> Result<Route> {
        self.notification = None;

        let accepted = validate(candidate).inspect_err(|e| self.notify(e.user_message()))?;
        info!(
            bytes = accepted.len(),
            mime = %accepted.mime_type(),
            "Image accepted for search"
        );

        let image = DataUri::encode(accepted.mime_type(), accepted.bytes());

        let service = self.service;
        let response = match service.search(&accepted).await {
            Ok(response) => response,
            Err(e) => {
                warn!(service = service.name(), error = %e, "Search failed");
                self.notify(e.user_message());
                return Err(e);
            }
        };

        self.store
            .write_session(&image, &response)
            .inspect_err(|e| self.notify(e.user_message()))?;

        info!(results = response.len(), route = %Route::Results, "Navigating to results");
        Ok(Route::Results)
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    fn notify(&mut self, message: String) {
        self.notification = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ImageMatchError, MAX_UPLOAD_BYTES};
    use crate::handoff::{MemoryStore, IMAGE_KEY, RESPONSE_KEY};
    use crate::transmitter::MockSearchService;

    #[tokio::test]
    async fn test_successful_submit_writes_each_slot_once() {
        let durable = MemoryStore::new();
        let tab = MemoryStore::new();
        let store = HandoffStore::new(&durable, &tab);
        let service = MockSearchService::default();
        let mut view = SubmissionView::new(&service, &store);

        let route = view
            .submit(UploadCandidate::new(vec![0xFF; 2 * 1024 * 1024], "image/jpeg"))
            .await
            .unwrap();

        assert_eq!(route, Route::Results);
        assert_eq!(durable.write_count(IMAGE_KEY), 1);
        assert_eq!(tab.write_count(RESPONSE_KEY), 1);
        assert!(store.load_session().is_ok());
        assert_eq!(service.uploads()[0].len, 2 * 1024 * 1024);
        assert!(view.notification().is_none());
    }

    #[tokio::test]
    async fn test_invalid_type_never_reaches_service() {
        let store = HandoffStore::in_memory();
        let service = MockSearchService::default();
        let mut view = SubmissionView::new(&service, &store);

        let err = view
            .submit(UploadCandidate::new(b"hello".to_vec(), "text/plain"))
            .await
            .unwrap_err();

        assert!(matches!(err, ImageMatchError::InvalidType { .. }));
        assert_eq!(service.call_count(), 0);
        assert!(store.durable().is_empty());
        assert!(store.tab().is_empty());
        assert_eq!(
            view.notification(),
            Some("Please select an image file (JPEG, PNG, etc.)")
        );
    }

    #[tokio::test]
    async fn test_too_large_never_reaches_service() {
        let store = HandoffStore::in_memory();
        let service = MockSearchService::default();
        let mut view = SubmissionView::new(&service, &store);

        let err = view
            .submit(UploadCandidate::new(
                vec![0u8; MAX_UPLOAD_BYTES as usize],
                "image/png",
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, ImageMatchError::TooLarge { .. }));
        assert_eq!(service.call_count(), 0);
        assert!(store.durable().is_empty());
    }

    #[tokio::test]
    async fn test_transmission_failure_writes_nothing() {
        let store = HandoffStore::in_memory();
        let service = MockSearchService::failing("connection refused");
        let mut view = SubmissionView::new(&service, &store);

        let err = view
            .submit(UploadCandidate::new(vec![1, 2, 3], "image/png"))
            .await
            .unwrap_err();

        assert!(matches!(err, ImageMatchError::Transmission(_)));
        assert!(store.durable().is_empty());
        assert!(store.tab().is_empty());
        assert!(view.notification().is_some());
    }
}
