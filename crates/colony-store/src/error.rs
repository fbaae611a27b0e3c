//! Error types for colony-store

use thiserror::Error;

/// Store error type
#[derive(Debug, Error)]
pub enum Error {
    /// Record not found (or not visible to the caller)
    #[error("not found: {0}")]
    NotFound(String),

    /// The actor does not own the record and is not an admin
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Input rejected before touching the database
    #[error("validation failed: {0}")]
    Validation(String),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
