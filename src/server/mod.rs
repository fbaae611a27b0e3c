//! Server module for Colony
//!
//! Contains the main server initialization and runtime logic.
//!
//! # Module Structure
//!
//! - `config`: Configuration structures for all server components
//! - `loader`: Configuration loading from files and environment
//! - `validation`: Startup configuration validation
//! - `services`: Database and orchestrator construction, shared with the CLI
//! - `init`: Router assembly and the run loop

pub mod config;
mod init;
mod loader;
mod services;
mod validation;

pub use init::{build_app, run};
pub use loader::load_config;
pub use services::{build_orchestrator, open_database};
pub use validation::validate_config;
