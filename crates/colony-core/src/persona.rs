//! Industry and persona profiles
//!
//! An industry carries a global context and a set of personas; a persona
//! picks the model, its own instruction and the sampling temperature.
//! Resolution always yields a concrete [`GenerationProfile`].

use colony_llm::{GenerationProfile, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Model settings of one persona
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaProfile {
    /// Gateway model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Persona instruction, used when a call has no composed prompt
    #[serde(default)]
    pub instruction: String,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// An industry and its personas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryProfile {
    /// Context prefixed to every system entry
    #[serde(default)]
    pub global_context: String,
    /// Personas by key
    #[serde(default)]
    pub personas: HashMap<String, PersonaProfile>,
}

/// All configured industries plus the default selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonaRegistry {
    /// Industry used when a request names none or an unknown one
    #[serde(default)]
    pub default_industry: String,
    /// Persona used when a request names none or an unknown one
    #[serde(default)]
    pub default_persona: String,
    /// Industries by key
    #[serde(default)]
    pub industries: HashMap<String, IndustryProfile>,
}

impl PersonaRegistry {
    /// Resolve requested keys to a generation profile.
    ///
    /// Unknown keys fall back to the defaults; with nothing configured the
    /// profile uses the default model, no context and no temperature.
    #[must_use]
    pub fn resolve(&self, industry: Option<&str>, persona: Option<&str>) -> GenerationProfile {
        let industry = industry
            .and_then(|key| self.industries.get(key))
            .or_else(|| self.industries.get(&self.default_industry));

        let Some(industry) = industry else {
            debug!("No industry profile, using defaults");
            return GenerationProfile::default();
        };

        let persona = persona
            .and_then(|key| industry.personas.get(key))
            .or_else(|| industry.personas.get(&self.default_persona));

        let mut profile = match persona {
            Some(p) => {
                let mut profile = GenerationProfile::new(p.model.clone());
                profile.temperature = p.temperature;
                if !p.instruction.trim().is_empty() {
                    profile = profile.with_fallback_instruction(p.instruction.clone());
                }
                profile
            }
            None => GenerationProfile::default(),
        };

        if !industry.global_context.trim().is_empty() {
            profile = profile.with_global_context(industry.global_context.clone());
        }
        profile
    }
}
