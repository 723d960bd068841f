//! Self-describing `data:<mime>;base64,<payload>` image encoding.
//!
//! The uploaded image crosses the navigation boundary in this form, and the
//! similarity service returns its matches the same way.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::{ImageMatchError, Result};

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// An image encoded as a base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    uri: String,
    mime_end: usize,
}

/// Decoded image, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    pub fn encode(mime_type: &str, bytes: &[u8]) -> Self {
        let uri = format!("{SCHEME}{mime_type}{BASE64_MARKER},{}", BASE64.encode(bytes));
        Self {
            uri,
            mime_end: SCHEME.len() + mime_type.len(),
        }
    }

    /// Parse a stored string. Only base64 data URIs are accepted.
    pub fn parse(value: &str) -> Result<Self> {
        let rest = value
            .strip_prefix(SCHEME)
            .ok_or_else(|| ImageMatchError::MalformedResponse("not a data URI".to_string()))?;
        let (header, _) = rest.split_once(',').ok_or_else(|| {
            ImageMatchError::MalformedResponse("data URI has no payload separator".to_string())
        })?;
        let mime = header.strip_suffix(BASE64_MARKER).ok_or_else(|| {
            ImageMatchError::MalformedResponse("data URI is not base64 encoded".to_string())
        })?;

        Ok(Self {
            uri: value.to_string(),
            mime_end: SCHEME.len() + mime.len(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.uri[SCHEME.len()..self.mime_end]
    }

    fn payload(&self) -> &str {
        &self.uri[self.mime_end + BASE64_MARKER.len() + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }

    pub fn into_string(self) -> String {
        self.uri
    }

    pub fn decode(&self) -> Result<MaterializedImage> {
        let bytes = BASE64.decode(self.payload()).map_err(|e| {
            ImageMatchError::MalformedResponse(format!("invalid base64 image payload: {e}"))
        })?;
        Ok(MaterializedImage {
            mime_type: self.mime_type().to_string(),
            bytes,
        })
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl MaterializedImage {
    /// File extension matching the MIME type, for saving to disk.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            "image/svg+xml" => "svg",
            "image/tiff" => "tiff",
            "image/avif" => "avif",
            _ => "bin",
        }
    }
}
