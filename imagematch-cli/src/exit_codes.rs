//! Exit codes following sysexits.h conventions.
//!
//! These codes provide semantic meaning for different failure modes,
//! enabling scripts to tell a rejected file from an unreachable service.

use imagematch_core::ImageMatchError;

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// General error (catch-all).
pub const GENERAL_ERROR: i32 = 1;

/// File rejected by validation (not an image, too large).
/// Maps to EX_DATAERR from sysexits.h.
pub const VALIDATION_FAILED: i32 = 65;

/// Cannot open input file, or no search session to show.
/// Maps to EX_NOINPUT from sysexits.h.
pub const INPUT_ERROR: i32 = 66;

/// Similarity service unavailable or misbehaving.
/// Maps to EX_UNAVAILABLE from sysexits.h.
pub const NETWORK_ERROR: i32 = 69;

/// I/O error (session storage, saved images).
/// Maps to EX_IOERR from sysexits.h.
pub const IO_ERROR: i32 = 74;

/// Represents an exit code with optional error context.
pub struct ExitCode {
    pub code: i32,
    pub message: Option<String>,
}

impl ExitCode {
    pub const fn success() -> Self {
        Self {
            code: SUCCESS,
            message: None,
        }
    }

    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");

        let code = match err
            .chain()
            .find_map(|cause| cause.downcast_ref::<ImageMatchError>())
        {
            Some(core) => code_for(core),
            None if message.contains("Failed to read file") => INPUT_ERROR,
            None if message.contains("Failed to write") => IO_ERROR,
            None => GENERAL_ERROR,
        };

        Self {
            code,
            message: Some(message),
        }
    }
}

fn code_for(err: &ImageMatchError) -> i32 {
    match err {
        ImageMatchError::InvalidType { .. } | ImageMatchError::TooLarge { .. } => {
            VALIDATION_FAILED
        }
        ImageMatchError::NoActiveSession => INPUT_ERROR,
        ImageMatchError::Transmission(_) | ImageMatchError::MalformedResponse(_) => NETWORK_ERROR,
        ImageMatchError::Storage(_) => IO_ERROR,
        ImageMatchError::InvalidConfig(_) => GENERAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_core_errors_map_through_context() {
        let err = Err::<(), _>(ImageMatchError::TooLarge {
            size_bytes: 11,
            limit_bytes: 10,
        })
        .context("Search failed")
        .unwrap_err();
        assert_eq!(ExitCode::from_anyhow(&err).code, VALIDATION_FAILED);

        let err = anyhow::Error::new(ImageMatchError::NoActiveSession);
        assert_eq!(ExitCode::from_anyhow(&err).code, INPUT_ERROR);

        let err = anyhow::Error::new(ImageMatchError::Transmission("refused".into()));
        assert_eq!(ExitCode::from_anyhow(&err).code, NETWORK_ERROR);
    }

    #[test]
    fn test_plain_errors() {
        let err = anyhow::anyhow!("Failed to read file: a.jpg");
        assert_eq!(ExitCode::from_anyhow(&err).code, INPUT_ERROR);
        assert_eq!(
            ExitCode::from_anyhow(&anyhow::anyhow!("boom")).code,
            GENERAL_ERROR
        );
    }
}
