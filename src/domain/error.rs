//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent catalog data violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Row has fewer fields than a course record needs (number and title).
    #[error("malformed row at line {line}: expected at least 2 fields, found {fields}")]
    MalformedRow { line: u64, fields: usize },

    /// Positional field access past the end of a row.
    #[error("can't return value at position {position} (row has {len} fields)")]
    ValueNotFound { position: usize, len: usize },

    #[error("cannot tokenize record near line {line}: {message}")]
    Tokenize { line: u64, message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
