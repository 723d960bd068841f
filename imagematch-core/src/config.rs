//! Client configuration
//!
//! The similarity service base URL is the only recognized option. It is injected
//! rather than compiled in so the same build talks to any deployment.

use tracing::warn;
use url::Url;

use crate::error::{ImageMatchError, Result};

/// Base URL used when nothing else is configured.
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8080";

/// Environment variable holding the service base URL.
pub const SERVICE_URL_ENV: &str = "IMAGEMATCH_SERVICE_URL";

const SEARCH_PATH: &str = "api/search";
const EMBED_PATH: &str = "api/embed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the similarity service (default: http://127.0.0.1:8080)
    pub service_url: Url,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: parse_base_url(DEFAULT_SERVICE_URL)
                .unwrap_or_else(|_| unreachable!("default service URL is valid")),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        match std::env::var(SERVICE_URL_ENV) {
            Ok(raw) => Self::with_service_url(&raw).unwrap_or_else(|e| {
                warn!(value = %raw, error = %e, "Ignoring invalid service URL");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn with_service_url(raw: &str) -> Result<Self> {
        Ok(Self {
            service_url: parse_base_url(raw)?,
        })
    }

    /// `POST` target for similarity searches.
    pub fn search_endpoint(&self) -> Url {
        self.join(SEARCH_PATH)
    }

    /// `POST` target that asks the service to index its image folder.
    pub fn embed_endpoint(&self) -> Url {
        self.join(EMBED_PATH)
    }

    fn join(&self, path: &str) -> Url {
        // Relative paths always join onto a base that ends with '/'.
        self.service_url
            .join(path)
            .unwrap_or_else(|_| self.service_url.clone())
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    let url = Url::parse(&with_slash)
        .map_err(|e| ImageMatchError::InvalidConfig(format!("invalid service URL '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ImageMatchError::InvalidConfig(format!(
            "unsupported service URL scheme '{other}'"
        ))),
    }
}
