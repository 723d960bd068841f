use thiserror::Error;

/// Upload ceiling (10 MiB). Files at or above this size are rejected.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ImageMatchError {
    #[error("Invalid file type: '{declared}' is not an image")]
    InvalidType { declared: String },

    #[error("File too large: {size_bytes} bytes (limit {limit_bytes} bytes)")]
    TooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("Transmission error: {0}")]
    Transmission(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No active search session")]
    NoActiveSession,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ImageMatchError {
    /// Notification text shown to the user when the flow stops on this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidType { .. } => "Please select an image file (JPEG, PNG, etc.)".to_string(),
            Self::TooLarge { .. } => {
                "File size too large. Please select an image under 10MB.".to_string()
            }
            Self::Transmission(_) => {
                "Could not reach the search service. Please try again.".to_string()
            }
            Self::MalformedResponse(_) | Self::NoActiveSession => {
                "No search in progress. Upload an image to start a new search.".to_string()
            }
            Self::Storage(msg) | Self::InvalidConfig(msg) => msg.clone(),
        }
    }

    /// Pre-flight errors the user fixes by picking another file.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidType { .. } | Self::TooLarge { .. })
    }
}

#[cfg(feature = "network")]
impl From<reqwest::Error> for ImageMatchError {
    fn from(err: reqwest::Error) -> Self {
        ImageMatchError::Transmission(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ImageMatchError>;
