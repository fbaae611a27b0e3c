//! Response shape resolution
//!
//! The gateway answers with one of several JSON layouts depending on the
//! model family and on whether the call failed upstream. `ResponseShape`
//! names each layout; `classify` is the only place that probes fields.

use crate::error::{GenerationError, Result};
use serde_json::Value;

/// Text returned when the gateway answers with a layout we do not know
pub const BLANK_RESPONSE_PLACEHOLDER: &str = "Connected to Hub, but the brain gave a blank look.";

/// The known gateway response layouts
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// `{success: false, errors: [{message, code}]}`
    Error {
        /// First error message
        message: String,
        /// First error code
        code: String,
    },
    /// `{result: {response: "..."}}`
    NestedResult(String),
    /// `{response: "..."}`
    FlatResult(String),
    /// `{result: <string or any other value>}`
    RawResult(String),
    /// Anything else, including bodies that are not JSON
    Unrecognized,
}

impl ResponseShape {
    /// Discriminate a parsed body
    #[must_use]
    pub fn classify(body: &Value) -> Self {
        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let first = body
                .get("errors")
                .and_then(Value::as_array)
                .and_then(|errors| errors.first());
            let message = first
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("Unknown Error")
                .to_string();
            let code = match first.and_then(|e| e.get("code")) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => "unknown".to_string(),
                Some(other) => other.to_string(),
            };
            return Self::Error { message, code };
        }

        let result = body.get("result").filter(|v| !v.is_null());

        if let Some(text) = result
            .and_then(|r| r.get("response"))
            .and_then(Value::as_str)
        {
            return Self::NestedResult(text.to_string());
        }

        if let Some(text) = body.get("response").and_then(Value::as_str) {
            return Self::FlatResult(text.to_string());
        }

        match result {
            Some(Value::String(s)) => Self::RawResult(s.clone()),
            Some(other) => Self::RawResult(other.to_string()),
            None => Self::Unrecognized,
        }
    }

    /// Discriminate a raw body; non-JSON bodies are `Unrecognized`
    #[must_use]
    pub fn classify_text(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::classify(&value),
            Err(_) => Self::Unrecognized,
        }
    }

    /// Resolve to answer text, or the upstream failure
    pub fn into_text(self) -> Result<String> {
        match self {
            Self::Error { message, code } => Err(GenerationError::Upstream { message, code }),
            Self::NestedResult(text) | Self::FlatResult(text) | Self::RawResult(text) => Ok(text),
            Self::Unrecognized => Ok(BLANK_RESPONSE_PLACEHOLDER.to_string()),
        }
    }
}
