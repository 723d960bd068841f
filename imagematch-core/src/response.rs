//! Response documents returned by the similarity service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data_uri::DataUri;
use crate::error::{ImageMatchError, Result};

/// Reply to `POST /api/search`.
///
/// Fields other than `results` are kept so the stored document round-trips verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<ImageResult>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One match in [`SearchResponse::results`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    #[serde(default)]
    pub id: i64,
    /// Match percentage, displayed verbatim.
    pub score: f64,
    #[serde(default)]
    pub similarity: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(
        default,
        rename = "imageData",
        alias = "image_base64",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

/// Reply to `POST /api/embed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedSummary {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub processed: u64,
    #[serde(default)]
    pub skipped: u64,
}

/// Error envelope the service sends with 4xx/5xx statuses.
#[cfg(feature = "network")]
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: String,
}

impl SearchResponse {
    pub fn new(results: Vec<ImageResult>) -> Self {
        Self {
            results,
            extra: Map::new(),
        }
    }

    /// Parse a service or stored document. Anything without a `results` array is malformed.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| ImageMatchError::MalformedResponse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ImageMatchError::Storage(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl ImageResult {
    pub fn new(id: i64, score: f64, category: impl Into<String>) -> Self {
        Self {
            id,
            score,
            similarity: 0.0,
            category: category.into(),
            tags: Vec::new(),
            image_data: None,
            image_path: None,
        }
    }

    /// Badge text, e.g. `97% match`.
    pub fn score_label(&self) -> String {
        format!("{}% match", self.score)
    }

    /// The inline image, when the service sent one as a data URI.
    pub fn data_uri(&self) -> Option<DataUri> {
        self.image_data
            .as_deref()
            .and_then(|value| DataUri::parse(value).ok())
    }
}
