//! Generator trait definition
//!
//! Every text-generation backend implements `Generator`. Requests always start
//! with exactly one system entry, then prior history, then the current prompt.

use crate::error::Result;
use crate::message::Message;
use crate::profile::GenerationProfile;
use tracing::warn;

/// A single generation call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Model and persona settings for this call
    pub profile: GenerationProfile,
    /// Ordered messages, system entry first
    pub messages: Vec<Message>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl GenerationRequest {
    /// Build a request from its three parts
    #[must_use]
    pub fn new(
        profile: GenerationProfile,
        system: impl Into<String>,
        history: Vec<Message>,
        prompt: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(system));
        messages.extend(history);
        messages.push(Message::user(prompt));
        Self {
            profile,
            messages,
            max_tokens,
        }
    }

    /// The system entry
    #[must_use]
    pub fn system(&self) -> Option<&Message> {
        self.messages.first()
    }

    /// The current user prompt
    #[must_use]
    pub fn prompt(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// History between the system entry and the current prompt
    #[must_use]
    pub fn history(&self) -> &[Message] {
        if self.messages.len() < 2 {
            return &[];
        }
        &self.messages[1..self.messages.len() - 1]
    }
}

/// Trait for text-generation backends
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    /// Backend name (for logging)
    fn name(&self) -> &str;

    /// Run one completion
    async fn complete(&self, request: GenerationRequest) -> Result<String>;
}

/// Run a completion and fold any failure into transcript text.
///
/// Callers persist the returned string directly, so this never fails.
pub async fn complete_in_band(generator: &dyn Generator, request: GenerationRequest) -> String {
    match generator.complete(request).await {
        Ok(text) => text,
        Err(e) => {
            warn!(generator = generator.name(), error = %e, "Generation failed, answering in-band");
            e.transcript_text()
        }
    }
}
