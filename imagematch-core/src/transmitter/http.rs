//! reqwest client for the similarity service.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::SearchService;
use crate::config::ClientConfig;
use crate::error::{ImageMatchError, Result};
use crate::response::{EmbedSummary, ErrorEnvelope, SearchResponse};
use crate::validator::AcceptedFile;

/// Multipart field that carries the raw image bytes.
pub const IMAGE_FIELD: &str = "image";

/// File name sent when the candidate had none.
const FALLBACK_FILE_NAME: &str = "upload";

/// HTTP client for `POST /api/search` and `POST /api/embed`.
pub struct HttpSearchClient {
    client: Client,
    config: ClientConfig,
}

impl HttpSearchClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().build().map_err(|e| {
            ImageMatchError::Transmission(format!("Failed to create HTTP client: {e}"))
        })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Ask the service to index its image folder.
    #[instrument(level = "debug", skip_all, fields(endpoint = %self.config.embed_endpoint()))]
    pub async fn trigger_indexing(&self) -> Result<EmbedSummary> {
        let start = Instant::now();
        let response = self
            .client
            .post(self.config.embed_endpoint())
            .send()
            .await?;
        let body = read_success_body(response, start).await?;

        serde_json::from_str(&body).map_err(|e| ImageMatchError::MalformedResponse(e.to_string()))
    }

    fn build_form(file: &AcceptedFile) -> Result<Form> {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.file_name().unwrap_or(FALLBACK_FILE_NAME).to_string())
            .mime_str(file.mime_type())?;
        Ok(Form::new().part(IMAGE_FIELD, part))
    }
}

#[async_trait]
impl SearchService for HttpSearchClient {
    #[instrument(level = "debug", skip_all, fields(
        endpoint = %self.config.search_endpoint(),
        bytes = file.len(),
        mime = %file.mime_type()
    ))]
    async fn search(&self, file: &AcceptedFile) -> Result<SearchResponse> {
        let form = Self::build_form(file)?;
        let start = Instant::now();

        info!("Sending image to similarity service");
        let response = self
            .client
            .post(self.config.search_endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(
                    error = %e,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Search request failed"
                );
                ImageMatchError::Transmission(format!("search request failed: {e}"))
            })?;

        let body = read_success_body(response, start).await?;
        let parsed = SearchResponse::from_json(&body).inspect_err(|e| {
            warn!(error = %e, "Search response has an unexpected shape");
        })?;

        debug!(
            results = parsed.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Search completed"
        );
        Ok(parsed)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Read the body, turning non-success statuses into `Transmission`.
async fn read_success_body(response: Response, start: Instant) -> Result<String> {
    let status = response.status();
    debug!(status = %status, "Received HTTP response");

    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }

    warn!(
        status = %status,
        latency_ms = start.elapsed().as_millis() as u64,
        "Similarity service returned an error status"
    );
    let detail = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error)
        .unwrap_or_else(|_| body.trim().chars().take(200).collect());

    Err(ImageMatchError::Transmission(if detail.is_empty() {
        format!("service returned status {status}")
    } else {
        format!("service returned status {status}: {detail}")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{validate, UploadCandidate};

    #[test]
    fn test_build_form_accepts_valid_file() {
        let file = validate(UploadCandidate::new(vec![1, 2, 3], "image/png")).unwrap();
        assert!(HttpSearchClient::build_form(&file).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transmission_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let config = ClientConfig::with_service_url("http://127.0.0.1:9").unwrap();
        let client = HttpSearchClient::new(config).unwrap();
        let file = validate(UploadCandidate::new(vec![0u8; 16], "image/jpeg")).unwrap();

        let err = client.search(&file).await.unwrap_err();
        assert!(matches!(err, ImageMatchError::Transmission(_)), "{err:?}");
    }
}
