//! CLI-specific error types

use std::fmt;
use std::io;

use crate::errors::PaginationError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// I/O error (stdin/stdout, data file)
    IoError,
    /// Stdin or data file is not the expected JSON
    InvalidInput,
    /// Rejected by the pagination engine, with its error code
    Pagination(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::IoError => "PAGINATION_CLI_IO_ERROR",
            Self::InvalidInput => "PAGINATION_CLI_INVALID_INPUT",
            Self::Pagination(code) => *code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Malformed input
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_input(format!("JSON error: {}", e))
    }
}

impl From<PaginationError> for CliError {
    fn from(e: PaginationError) -> Self {
        Self::new(CliErrorCode::Pagination(e.code()), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_error_keeps_code() {
        let err = CliError::from(PaginationError::UnknownField("email".to_string()));
        assert_eq!(err.code_str(), "PAGINATION_UNKNOWN_FIELD");
        assert!(err.message().contains("email"));
    }

    #[test]
    fn test_display() {
        let err = CliError::invalid_input("Empty input");
        assert_eq!(err.to_string(), "PAGINATION_CLI_INVALID_INPUT: Empty input");
    }
}
