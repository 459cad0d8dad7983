//! # Pagination Errors
//!
//! Error types shared by every pagination component.
//!
//! Nothing in this crate retries: every error stems from invalid input or
//! misconfiguration and is returned to the immediate caller.

use thiserror::Error;

/// Result type for pagination operations
pub type PaginationResult<T> = Result<T, PaginationError>;

/// Pagination errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    // ==================
    // Request Errors
    // ==================
    /// Malformed or contradictory paging arguments
    #[error("Invalid paging arguments: {0}")]
    Validation(String),

    /// Cursor token could not be decoded
    #[error("Invalid cursor: {0}")]
    Decode(String),

    /// Order or filter field missing from the attribute map
    #[error("Field `{0}` either does not exist or is not accessible. Check the attribute map")]
    UnknownField(String),

    /// Filter operator missing from the operator map
    #[error("Operator `{0}` either does not exist or is not accessible. Check the operator map")]
    UnknownOperator(String),

    // ==================
    // Contract Errors
    // ==================
    /// Accessor used before the result rows were supplied
    #[error("Result must be supplied before {0} can be read")]
    State(&'static str),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cursor payload could not be serialized into a token
    #[error("Failed to encode cursor: {0}")]
    Encode(String),
}

impl PaginationError {
    /// Shorthand for a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PaginationError::Validation(message.into())
    }

    /// Shorthand for a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        PaginationError::Decode(message.into())
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            PaginationError::Validation(_) => "PAGINATION_VALIDATION_FAILED",
            PaginationError::Decode(_) => "PAGINATION_CURSOR_INVALID",
            PaginationError::UnknownField(_) => "PAGINATION_UNKNOWN_FIELD",
            PaginationError::UnknownOperator(_) => "PAGINATION_UNKNOWN_OPERATOR",
            PaginationError::State(_) => "PAGINATION_STATE_VIOLATION",
            PaginationError::Config(_) => "PAGINATION_CONFIG_INVALID",
            PaginationError::Encode(_) => "PAGINATION_CURSOR_ENCODE_FAILED",
        }
    }

    /// Whether the caller's request (rather than the program) is at fault.
    ///
    /// Decode failures count as a rejected paging request.
    pub fn is_request_error(&self) -> bool {
        !matches!(
            self,
            PaginationError::State(_) | PaginationError::Config(_) | PaginationError::Encode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PaginationError::validation("x").code(),
            "PAGINATION_VALIDATION_FAILED"
        );
        assert_eq!(
            PaginationError::decode("x").code(),
            "PAGINATION_CURSOR_INVALID"
        );
        assert_eq!(
            PaginationError::State("edges").code(),
            "PAGINATION_STATE_VIOLATION"
        );
        assert_eq!(
            PaginationError::Encode("x".to_string()).code(),
            "PAGINATION_CURSOR_ENCODE_FAILED"
        );
    }

    #[test]
    fn test_request_errors() {
        assert!(PaginationError::decode("bad base64").is_request_error());
        assert!(PaginationError::UnknownField("age".to_string()).is_request_error());
        assert!(!PaginationError::State("page info").is_request_error());
        assert!(!PaginationError::Config("empty".to_string()).is_request_error());
        assert!(!PaginationError::Encode("not serializable".to_string()).is_request_error());
    }

    #[test]
    fn test_display_names_the_field() {
        let err = PaginationError::UnknownField("nickname".to_string());
        assert!(err.to_string().contains("nickname"));
        assert!(err.to_string().contains("attribute map"));
    }
}
