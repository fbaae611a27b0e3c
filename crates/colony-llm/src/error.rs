//! Error types for colony-llm
//!
//! The `Display` form of every variant is the short, human-readable text that
//! ends up in the transcript when a turn's generation fails.

use thiserror::Error;

/// Generation error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The gateway answered with `success: false`
    #[error("{message} (Code: {code})")]
    Upstream {
        /// First error message reported by the gateway
        message: String,
        /// Error code reported alongside the message
        code: String,
    },

    /// Non-2xx HTTP status
    #[error("AI Error: {0}")]
    Status(u16),

    /// Connection or transport failure
    #[error("System Error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout
    #[error("System Error: request timed out after {0}s")]
    Timeout(u64),

    /// The client could not be built or the request could not be encoded
    #[error("System Error: {0}")]
    Client(String),
}

impl GenerationError {
    /// Text persisted into the transcript in place of a model answer
    #[must_use]
    pub fn transcript_text(&self) -> String {
        self.to_string()
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GenerationError>;
