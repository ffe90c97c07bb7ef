//! Linter error types.

use thiserror::Error;
use trivialint_ast::{Span, SpliceError};
use trivialint_parser::ParseError;

/// Errors that can occur during linting.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error.
    #[error("File error: {0}")]
    File(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Two edits in one batch touch overlapping spans. Always a rule defect.
    #[error(
        "Conflicting edits: {first_rule} at {}..{} overlaps {second_rule} at {}..{}",
        .first.start, .first.end, .second.start, .second.end
    )]
    ConflictingEdits {
        first_rule: String,
        first: Span,
        second_rule: String,
        second: Span,
    },

    /// Analysis was cancelled by the caller.
    #[error("Analysis cancelled")]
    Cancelled,

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a file error.
    pub fn file(message: impl Into<String>) -> Self {
        Self::File(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<SpliceError> for LinterError {
    fn from(err: SpliceError) -> Self {
        Self::Internal(format!("Invalid trivia splice: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicting_edits_message() {
        let err = LinterError::ConflictingEdits {
            first_rule: "final-newline".to_string(),
            first: Span::new(10, 14),
            second_rule: "no-trailing-whitespace".to_string(),
            second: Span::new(12, 14),
        };
        assert_eq!(
            err.to_string(),
            "Conflicting edits: final-newline at 10..14 overlaps no-trailing-whitespace at 12..14"
        );
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: LinterError = ParseError::invalid_source("bad").into();
        assert!(matches!(err, LinterError::Parse(_)));
    }
}
