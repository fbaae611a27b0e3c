//! Thread title synthesis

use colony_llm::{GenerationProfile, GenerationRequest, Generator};
use colony_store::{normalize_title, NEW_CHAT_TITLE};
use std::sync::Arc;
use tracing::{debug, warn};

/// Token budget for title calls
pub const TITLE_MAX_TOKENS: u32 = 100;

/// Prompt asking the model for a short title
#[must_use]
pub fn title_prompt(first_user_message: &str) -> String {
    format!(
        "Create a very concise (max 4 words) title for a chat that starts with this message: \
         \"{first_user_message}\". Return ONLY the title text."
    )
}

/// Derives thread titles with a secondary generation call
#[derive(Clone)]
pub struct TitleSynthesizer {
    generator: Arc<dyn Generator>,
    max_tokens: u32,
}

impl TitleSynthesizer {
    /// Create a synthesizer over a generator
    #[must_use]
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            max_tokens: TITLE_MAX_TOKENS,
        }
    }

    /// Set the token budget
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Produce a title; failures and empty output yield the default title
    pub async fn synthesize(&self, first_user_message: &str, profile: &GenerationProfile) -> String {
        let request = GenerationRequest::new(
            profile.clone(),
            profile.base_instruction(),
            Vec::new(),
            title_prompt(first_user_message),
            self.max_tokens,
        );

        match self.generator.complete(request).await {
            Ok(text) => {
                let title = normalize_title(&text);
                debug!("Synthesized title {:?}", title);
                title
            }
            Err(e) => {
                warn!(error = %e, "Title synthesis failed");
                NEW_CHAT_TITLE.to_string()
            }
        }
    }
}
