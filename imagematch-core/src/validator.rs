//! Pre-flight checks on a file before it is sent to the similarity service.
//!
//! Only the declared MIME type and the size are checked. The declared type is
//! trusted as-is: no content sniffing, no dimension probing.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{ImageMatchError, Result, MAX_UPLOAD_BYTES};

/// MIME prefix every accepted upload must carry.
const IMAGE_MIME_PREFIX: &str = "image/";

/// A file the user selected or dropped, before validation.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub bytes: Vec<u8>,
    pub declared_mime_type: String,
    pub size_bytes: u64,
    pub file_name: Option<String>,
}

impl UploadCandidate {
    pub fn new(bytes: Vec<u8>, declared_mime_type: impl Into<String>) -> Self {
        let size_bytes = bytes.len() as u64;
        Self {
            bytes,
            declared_mime_type: declared_mime_type.into(),
            size_bytes,
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Build a candidate from file contents, declaring the MIME type from the extension.
    pub fn from_path_bytes(path: &Path, bytes: Vec<u8>) -> Self {
        let candidate = Self::new(bytes, declared_mime_for_path(path));
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => candidate.with_file_name(name),
            None => candidate,
        }
    }
}

/// A candidate that passed validation. Only [`validate`] constructs one.
#[derive(Debug, Clone)]
pub struct AcceptedFile {
    bytes: Vec<u8>,
    mime_type: String,
    file_name: Option<String>,
}

impl AcceptedFile {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Check the declared type first, then the size.
pub fn validate(candidate: UploadCandidate) -> Result<AcceptedFile> {
    validate_mime_type(&candidate.declared_mime_type)?;
    validate_size(candidate.size_bytes)?;

    debug!(
        mime = %candidate.declared_mime_type,
        bytes = candidate.size_bytes,
        "Upload candidate accepted"
    );

    Ok(AcceptedFile {
        bytes: candidate.bytes,
        mime_type: candidate.declared_mime_type,
        file_name: candidate.file_name,
    })
}

pub fn validate_mime_type(declared: &str) -> Result<()> {
    if declared.to_lowercase().starts_with(IMAGE_MIME_PREFIX) {
        Ok(())
    } else {
        warn!(declared = %declared, "Rejected upload: not an image type");
        Err(ImageMatchError::InvalidType {
            declared: declared.to_string(),
        })
    }
}

pub fn validate_size(size_bytes: u64) -> Result<()> {
    if size_bytes >= MAX_UPLOAD_BYTES {
        warn!(bytes = size_bytes, limit = MAX_UPLOAD_BYTES, "Rejected upload: too large");
        Err(ImageMatchError::TooLarge {
            size_bytes,
            limit_bytes: MAX_UPLOAD_BYTES,
        })
    } else {
        Ok(())
    }
}

/// MIME type a browser would declare for this file name.
pub fn declared_mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("tif" | "tiff") => "image/tiff",
        Some("avif") => "image/avif",
        Some("txt") => "text/plain",
        Some("pdf") => "application/pdf",
        Some("json") => "application/json",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_image_types() {
        for mime in ["image/jpeg", "image/png", "image/webp", "IMAGE/GIF"] {
            let candidate = UploadCandidate::new(vec![0u8; 64], mime);
            assert!(validate(candidate).is_ok(), "{mime} should be accepted");
        }
    }

    #[test]
    fn test_rejects_non_image_types() {
        for mime in ["text/plain", "application/pdf", "video/mp4", "", "application/octet-stream"] {
            let err = validate(UploadCandidate::new(vec![1, 2, 3], mime)).unwrap_err();
            assert!(
                matches!(err, ImageMatchError::InvalidType { .. }),
                "{mime} should be InvalidType, got {err:?}"
            );
        }
    }

    #[test]
    fn test_size_ceiling() {
        assert!(validate_size(MAX_UPLOAD_BYTES - 1).is_ok());
        assert!(matches!(
            validate_size(MAX_UPLOAD_BYTES),
            Err(ImageMatchError::TooLarge { .. })
        ));
        assert!(matches!(
            validate_size(MAX_UPLOAD_BYTES + 1),
            Err(ImageMatchError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_type_checked_before_size() {
        let mut candidate = UploadCandidate::new(Vec::new(), "text/html");
        candidate.size_bytes = MAX_UPLOAD_BYTES * 2;
        assert!(matches!(
            validate(candidate),
            Err(ImageMatchError::InvalidType { .. })
        ));
    }

    #[test]
    fn test_accepted_file_keeps_bytes_and_name() {
        let candidate =
            UploadCandidate::from_path_bytes(Path::new("/tmp/beach.JPG"), vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(candidate.declared_mime_type, "image/jpeg");

        let accepted = validate(candidate).unwrap();
        assert_eq!(accepted.bytes(), &[0xFF, 0xD8, 0xFF]);
        assert_eq!(accepted.mime_type(), "image/jpeg");
        assert_eq!(accepted.file_name(), Some("beach.JPG"));
    }

    #[test]
    fn test_declared_mime_for_path() {
        assert_eq!(declared_mime_for_path(Path::new("a.png")), "image/png");
        assert_eq!(declared_mime_for_path(Path::new("a.notes.txt")), "text/plain");
        assert_eq!(
            declared_mime_for_path(Path::new("noext")),
            "application/octet-stream"
        );
    }
}
