//! Per-call generation settings
//!
//! A `GenerationProfile` travels with every request instead of being bound to
//! the client at construction, so one client can serve any persona.

use serde::{Deserialize, Serialize};

/// Model used when no persona profile names one
pub const DEFAULT_MODEL: &str = "@cf/meta/llama-3.1-8b-instruct";

/// Base instruction of last resort
pub const GENERIC_INSTRUCTION: &str = "You are a helpful assistant.";

/// Model and persona settings for a single generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationProfile {
    /// Gateway model identifier
    pub model: String,
    /// Sampling temperature, sent only when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Industry-wide context prefixed to the system entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_context: Option<String>,
    /// Persona instruction for calls that carry no composed instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_instruction: Option<String>,
}

impl Default for GenerationProfile {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            global_context: None,
            fallback_instruction: None,
        }
    }
}

impl GenerationProfile {
    /// Create a profile for a model
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the industry context
    #[must_use]
    pub fn with_global_context(mut self, context: impl Into<String>) -> Self {
        self.global_context = Some(context.into());
        self
    }

    /// Set the persona's own instruction
    #[must_use]
    pub fn with_fallback_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.fallback_instruction = Some(instruction.into());
        self
    }

    /// Instruction for calls without a composed system prompt
    #[must_use]
    pub fn base_instruction(&self) -> &str {
        self.fallback_instruction
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(GENERIC_INSTRUCTION)
    }

    /// Final system text sent on the wire
    #[must_use]
    pub fn system_content(&self, instruction: &str) -> String {
        match self.global_context.as_deref().map(str::trim) {
            Some(context) if !context.is_empty() => format!("{context} {instruction}"),
            _ => instruction.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_content_prefixes_global_context() {
        let profile = GenerationProfile::default().with_global_context("Agency context.");
        assert_eq!(
            profile.system_content("Be brief."),
            "Agency context. Be brief."
        );
        assert_eq!(
            GenerationProfile::default().system_content("Be brief."),
            "Be brief."
        );
    }

    #[test]
    fn test_base_instruction_fallback() {
        assert_eq!(
            GenerationProfile::default().base_instruction(),
            GENERIC_INSTRUCTION
        );
        let profile = GenerationProfile::default().with_fallback_instruction("Marketing advice.");
        assert_eq!(profile.base_instruction(), "Marketing advice.");
    }
}
