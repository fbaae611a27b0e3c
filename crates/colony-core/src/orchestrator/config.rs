//! Orchestrator configuration

use crate::title::TITLE_MAX_TOKENS;

/// Default token budget for answers
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Configuration for the turn orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Token budget when the request names none
    pub default_max_tokens: u32,
    /// Token budget for title synthesis
    pub title_max_tokens: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_max_tokens: DEFAULT_MAX_TOKENS,
            title_max_tokens: TITLE_MAX_TOKENS,
        }
    }
}

impl OrchestratorConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default answer budget
    #[must_use]
    pub fn with_default_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = max_tokens;
        self
    }
}
