//! Configuration loading
//!
//! Sources, lowest priority first: the embedded defaults, optional files under
//! `config/`, then `COLONY_<SECTION>__<KEY>` environment variables.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Deployment environment name, from `COLONY_ENV`
pub fn environment_name() -> String {
    std::env::var("COLONY_ENV").unwrap_or_else(|_| "development".to_string())
}

fn file_sources(environment: &str) -> ConfigBuilder<DefaultState> {
    Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{environment}")).required(false))
        .add_source(File::with_name("config/local").required(false))
}

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let config = file_sources(&environment_name())
        // Single `_` after the prefix, `__` between nested keys
        .add_source(
            Environment::with_prefix("COLONY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}
