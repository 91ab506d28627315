// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// Caller-supplied input rejected before any engine work
    ValidationFailed(String),
    /// File not found
    FileNotFound(String),
    /// Invalid file format
    InvalidFormat(String),
    /// Media engine could not determine the duration or found no video stream
    ProbeFailed(String),
    /// Media engine invocation failed; carries the engine's own message
    ProcessingError(String),
    /// File system operation failed
    FsFail(String),
    /// Configuration could not be loaded or is invalid
    ConfigError(String),
    /// Internal error
    InternalError(String),
}

impl DomainError {
    /// Whether the error was raised before any media engine work started
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::BadArgs(_)
                | DomainError::ValidationFailed(_)
                | DomainError::FileNotFound(_)
                | DomainError::InvalidFormat(_)
        )
    }

    /// Message without the variant prefix, as reported by whoever raised it
    pub fn detail(&self) -> String {
        match self {
            DomainError::BadArgs(msg)
            | DomainError::ValidationFailed(msg)
            | DomainError::FileNotFound(msg)
            | DomainError::InvalidFormat(msg)
            | DomainError::ProbeFailed(msg)
            | DomainError::ProcessingError(msg)
            | DomainError::FsFail(msg)
            | DomainError::ConfigError(msg)
            | DomainError::InternalError(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::ValidationFailed(msg) => write!(f, "Validation failed: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            DomainError::ProbeFailed(msg) => write!(f, "Probe failed: {}", msg),
            DomainError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
