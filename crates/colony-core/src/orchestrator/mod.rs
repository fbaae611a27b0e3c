//! Orchestrator - One conversational turn, end to end
//!
//! # Module Structure
//!
//! - `types`: TurnRequest, TurnResponse and the TurnState machine
//! - `config`: OrchestratorConfig
//! - `engine`: TurnOrchestrator struct and builder methods
//! - `process`: the turn pipeline

mod config;
mod engine;
mod process;
mod types;


pub use config::{OrchestratorConfig, DEFAULT_MAX_TOKENS};
pub use engine::TurnOrchestrator;
pub use types::{TurnRequest, TurnResponse, TurnState};
