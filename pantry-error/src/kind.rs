//! Error kinds for pantry operations

use std::fmt;

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to decide how a failure is surfaced: request
/// validation becomes a client error, backend and output failures are folded
/// into the recipe envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// Invalid configuration (bad backend URL, unusable HTTP client settings)
    ConfigInvalid,

    // =========================================================================
    // Request errors
    // =========================================================================
    /// The caller's request is missing fields or carries invalid values
    InvalidRequest,

    // =========================================================================
    // Backend errors
    // =========================================================================
    /// The text-generation backend could not be reached
    BackendUnreachable,

    /// The backend answered with a non-success status
    BackendFailed,

    /// The backend answered, but the body is not a generate response
    MalformedResponse,

    // =========================================================================
    // Output errors
    // =========================================================================
    /// The generated text contains no JSON object at all
    NoJsonFound,

    /// The generated text contains braces, but no object that decodes
    InvalidJson,

    // =========================================================================
    // IO errors
    // =========================================================================
    /// Terminal or socket IO failed
    IoFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unexpected => "Unexpected",
            ErrorKind::ConfigInvalid => "ConfigInvalid",

            ErrorKind::InvalidRequest => "InvalidRequest",

            ErrorKind::BackendUnreachable => "BackendUnreachable",
            ErrorKind::BackendFailed => "BackendFailed",
            ErrorKind::MalformedResponse => "MalformedResponse",

            ErrorKind::NoJsonFound => "NoJsonFound",
            ErrorKind::InvalidJson => "InvalidJson",

            ErrorKind::IoFailed => "IoFailed",
        }
    }

    /// Check if this error kind is retryable by default
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::BackendUnreachable)
    }

    /// Errors caused by the caller rather than by the backend or by us
    pub fn is_client_error(&self) -> bool {
        matches!(self, ErrorKind::InvalidRequest)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::NoJsonFound.to_string(), "NoJsonFound");
        assert_eq!(ErrorKind::BackendUnreachable.to_string(), "BackendUnreachable");
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorKind::BackendUnreachable.is_retryable());
        assert!(!ErrorKind::BackendFailed.is_retryable());
        assert!(!ErrorKind::InvalidJson.is_retryable());
        assert!(!ErrorKind::InvalidRequest.is_retryable());
    }

    #[test]
    fn test_is_client_error() {
        assert!(ErrorKind::InvalidRequest.is_client_error());
        assert!(!ErrorKind::MalformedResponse.is_client_error());
    }
}
