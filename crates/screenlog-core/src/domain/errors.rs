//! Domain error types
//!
//! Errors raised while parsing or validating domain values.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Unknown application severity name
    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),

    /// Unknown sink level name or ordinal
    #[error("Unknown sink level: {0}")]
    UnknownSinkLevel(String),

    /// Report identifier is not 10 lowercase hex characters
    #[error("Invalid report identifier: {0}")]
    InvalidReportId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::UnknownSeverity("loud".to_string());
        assert_eq!(err.to_string(), "Unknown severity: loud");

        let err = DomainError::InvalidReportId("xyz".to_string());
        assert_eq!(err.to_string(), "Invalid report identifier: xyz");
    }

    #[test]
    fn test_error_equality() {
        let err1 = DomainError::UnknownSinkLevel("7".to_string());
        let err2 = DomainError::UnknownSinkLevel("7".to_string());
        let err3 = DomainError::UnknownSinkLevel("8".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
