//! Mock similarity service for testing.

use std::sync::Mutex;

use async_trait::async_trait;

use super::SearchService;
use crate::error::{ImageMatchError, Result};
use crate::response::{ImageResult, SearchResponse};
use crate::validator::AcceptedFile;

/// What the mock saw for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    pub mime_type: String,
    pub file_name: Option<String>,
    pub len: usize,
}

/// Mock search service returning a canned reply.
/// WARNING: performs no image analysis - results ignore the uploaded bytes.
pub struct MockSearchService {
    outcome: std::result::Result<SearchResponse, String>,
    uploads: Mutex<Vec<RecordedUpload>>,
}

impl MockSearchService {
    pub fn new(response: SearchResponse) -> Self {
        Self {
            outcome: Ok(response),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// A mock whose every call fails with `Transmission`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Number of `search` calls so far.
    pub fn call_count(&self) -> usize {
        self.uploads.lock().map(|u| u.len()).unwrap_or_default()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

impl Default for MockSearchService {
    /// One match per known category, scores descending from 97.
    fn default() -> Self {
        let results = ["nature", "urban", "portrait", "food", "nature"]
            .iter()
            .enumerate()
            .map(|(i, category)| {
                let mut result = ImageResult::new(i as i64 + 1, 97.0 - 6.0 * i as f64, *category);
                result.similarity = result.score / 100.0;
                result
            })
            .collect();
        Self::new(SearchResponse::new(results))
    }
}

#[async_trait]
impl SearchService for MockSearchService {
    async fn search(&self, file: &AcceptedFile) -> Result<SearchResponse> {
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(RecordedUpload {
                mime_type: file.mime_type().to_string(),
                file_name: file.file_name().map(str::to_string),
                len: file.len(),
            });
        }

        match &self.outcome {
            Ok(response) => Ok(response.clone()),
            Err(message) => Err(ImageMatchError::Transmission(message.clone())),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{validate, UploadCandidate};

    #[tokio::test]
    async fn test_mock_records_uploads() {
        let mock = MockSearchService::default();
        let file =
            validate(UploadCandidate::new(vec![7u8; 10], "image/png").with_file_name("a.png"))
                .unwrap();

        let response = mock.search(&file).await.unwrap();
        assert_eq!(response.len(), 5);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(
            mock.uploads()[0],
            RecordedUpload {
                mime_type: "image/png".to_string(),
                file_name: Some("a.png".to_string()),
                len: 10,
            }
        );
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockSearchService::failing("connection refused");
        let file = validate(UploadCandidate::new(vec![1], "image/png")).unwrap();

        assert!(matches!(
            mock.search(&file).await,
            Err(ImageMatchError::Transmission(_))
        ));
        assert_eq!(mock.call_count(), 1);
    }
}
