//! Colony Core - Conversational provisioning engine
//!
//! This crate turns one user message into one answer:
//! - Composer: layered system instruction with catalog context
//! - Directive: `[CREATE_ANT]` extraction and answer cleanup
//! - Provisioner: private agents from parsed directives
//! - Title: conversation title synthesis
//! - Persona: industry/persona generation profiles
//! - Orchestrator: the per-turn pipeline tying it all together

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod composer;
pub mod directive;
pub mod error;
pub mod orchestrator;
pub mod persona;
pub mod provisioner;
pub mod title;

pub use composer::{catalog_listing, compose_system_prompt, PromptContext};
pub use directive::{
    DirectiveParser, Extraction, MarkerDirectiveParser, RawDirective, DIRECTIVE_MARKER,
    PROVISIONED_CONFIRMATION,
};
pub use error::{format_error_for_cli, Error, Result, UserFriendlyError};
pub use orchestrator::{
    OrchestratorConfig, TurnOrchestrator, TurnRequest, TurnResponse, TurnState,
    DEFAULT_MAX_TOKENS,
};
pub use persona::{IndustryProfile, PersonaProfile, PersonaRegistry};
pub use provisioner::AgentProvisioner;
pub use title::{title_prompt, TitleSynthesizer, TITLE_MAX_TOKENS};
