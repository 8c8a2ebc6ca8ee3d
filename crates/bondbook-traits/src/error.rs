//! Error types for trait operations.

use thiserror::Error;

/// Common error type for storage operations.
#[derive(Debug, Error)]
pub enum TraitError {
    /// A record with the same key already exists
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// A write referenced a row that does not exist
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Parse/deserialization error
    #[error("parse error: {0}")]
    ParseError(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Database error
    #[error("database error: {0}")]
    DatabaseError(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for TraitError {
    fn from(e: std::io::Error) -> Self {
        TraitError::IoError(e.to_string())
    }
}

/// Why a legal-name lookup failed.
///
/// Every variant aborts bond creation; none is retried.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The request could not be sent or the response body not read
    #[error("transport error: {0}")]
    Transport(String),

    /// The registry did not answer within the configured deadline
    #[error("registry lookup timed out")]
    Timeout,

    /// The registry answered with a non-success status
    #[error("registry returned status {0}")]
    Status(u16),

    /// The response body is not in the expected shape
    #[error("malformed registry response: {0}")]
    Malformed(String),

    /// No record in the response carries the requested LEI
    #[error("no registry record for {0}")]
    NotFound(String),
}
