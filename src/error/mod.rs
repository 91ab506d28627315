//! Error handling module for video-splitter

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for video-splitter operations
#[derive(Error, Debug)]
pub enum SplitterError {
    /// Input rejected before the media engine was involved
    #[error("{message}")]
    Validation { message: String },

    /// Source could not be probed or has no video stream
    #[error("Failed to probe media file: {message}")]
    Probe { message: String },

    /// At least one segment could not be produced
    #[error("{failed} of {attempted} segments failed")]
    SegmentsFailed { failed: usize, attempted: usize },

    /// Configuration file or value error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other domain error
    #[error(transparent)]
    Domain(DomainError),
}

impl SplitterError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            SplitterError::Validation { .. }
            | SplitterError::Probe { .. }
            | SplitterError::SegmentsFailed { .. }
            | SplitterError::Config { .. }
            | SplitterError::Io(_)
            | SplitterError::Domain(_) => 1,
        }
    }
}

impl From<DomainError> for SplitterError {
    fn from(error: DomainError) -> Self {
        match error {
            e if e.is_validation() => SplitterError::Validation { message: e.detail() },
            DomainError::ProbeFailed(message) => SplitterError::Probe { message },
            DomainError::ConfigError(message) => SplitterError::Config { message },
            other => SplitterError::Domain(other),
        }
    }
}

/// Result type alias for video-splitter operations
pub type SplitterResult<T> = std::result::Result<T, SplitterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_mapping() {
        let err: SplitterError = DomainError::ValidationFailed("Please provide a valid output folder path: /x".into()).into();
        assert_eq!(err.to_string(), "Please provide a valid output folder path: /x");

        let err: SplitterError = DomainError::ProbeFailed("No video stream found".into()).into();
        assert!(matches!(err, SplitterError::Probe { .. }));
        assert_eq!(err.to_string(), "Failed to probe media file: No video stream found");

        let err: SplitterError = DomainError::ConfigError("bad".into()).into();
        assert!(matches!(err, SplitterError::Config { .. }));

        let err: SplitterError = DomainError::InternalError("oops".into()).into();
        assert_eq!(err.to_string(), "Internal error: oops");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SplitterError = io.into();
        assert!(matches!(err, SplitterError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: denied");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_segments_failed_message() {
        let err = SplitterError::SegmentsFailed { failed: 2, attempted: 5 };
        assert_eq!(err.to_string(), "2 of 5 segments failed");
    }
}
