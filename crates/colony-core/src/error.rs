//! Error types for colony-core
//!
//! Generation failures are not errors here: they are folded into the answer
//! text. What remains are the conditions that reject a request outright.

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// The actor may not touch the thread or agent
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The request is missing or has malformed fields
    #[error("validation error: {0}")]
    Validation(String),

    /// The record does not exist (or is not visible to the actor)
    #[error("not found: {0}")]
    NotFound(String),

    /// Persistence failure
    #[error("store error: {0}")]
    Store(String),

    /// Invalid settings
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<colony_store::Error> for Error {
    fn from(e: colony_store::Error) -> Self {
        match e {
            colony_store::Error::Unauthorized(msg) => Self::Unauthorized(msg),
            colony_store::Error::Validation(msg) => Self::Validation(msg),
            colony_store::Error::NotFound(msg) => Self::NotFound(msg),
            other => Self::Store(other.to_string()),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for user-friendly error messages
///
/// Provides human-readable error messages and suggestions for fixing.
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get a suggestion for how to fix the error
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::Unauthorized(_) => "🔒 You do not have access to this resource.".to_string(),
            Error::Validation(msg) => format!("📝 Invalid request: {}", msg),
            Error::NotFound(what) => format!("🔍 Not found: {}", what),
            Error::Store(msg) => format!("💾 Storage error: {}", msg),
            Error::Configuration(msg) => format!("⚙️ Configuration error: {}", msg),
            Error::Internal(msg) => format!("❌ Internal error: {}", msg),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::Unauthorized(_) => {
                Some("💡 Use a thread id you own, or start a new thread.".to_string())
            }
            Error::Validation(_) => {
                Some("💡 Provide a non-empty prompt and thread_id.".to_string())
            }
            Error::Configuration(_) => Some(
                "💡 Check config/default.toml or the COLONY_* environment variables.".to_string(),
            ),
            Error::Store(_) => Some("💡 Check that the database path is writable.".to_string()),
            _ => None,
        }
    }
}

/// Format an error for display in the CLI
pub fn format_error_for_cli(error: &Error) -> String {
    let mut output = error.user_message();
    if let Some(suggestion) = error.suggestion() {
        output.push_str("\n\n");
        output.push_str(&suggestion);
    }
    output
}
