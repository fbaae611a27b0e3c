//! Service construction
//!
//! Opens the database and assembles the turn orchestrator. Used by the
//! server and by the CLI commands that run without it.

use super::config::AppConfig;
use anyhow::{Context, Result};
use colony_core::{OrchestratorConfig, TurnOrchestrator};
use colony_llm::GatewayClient;
use colony_store::{AgentCatalog, Database};
use std::sync::Arc;
use tracing::info;

/// Open the configured database and run migrations
pub async fn open_database(config: &AppConfig) -> Result<Database> {
    if config.database.in_memory {
        info!("Using in-memory database");
        return Database::in_memory()
            .await
            .context("Failed to open in-memory database");
    }

    let path = config.database.resolved_path();
    Database::from_path(&path)
        .await
        .with_context(|| format!("Failed to open database at {}", path.display()))
}

/// Build the orchestrator over `db`, seeding the platform agents when enabled
pub async fn build_orchestrator(config: &AppConfig, db: Database) -> Result<TurnOrchestrator> {
    if config.catalog.seed_defaults {
        let inserted = AgentCatalog::new(db.clone())
            .seed_defaults()
            .await
            .context("Failed to seed default agents")?;
        if inserted > 0 {
            info!(inserted, "Seeded default agents");
        }
    }

    let gateway_config = config.gateway.client_config();
    info!(gateway = ?gateway_config, "Gateway configured");
    let generator =
        GatewayClient::new(gateway_config).context("Failed to create gateway client")?;

    let orchestrator_config =
        OrchestratorConfig::new().with_default_max_tokens(config.gateway.default_max_tokens);

    Ok(
        TurnOrchestrator::new(db, Arc::new(generator), orchestrator_config)
            .with_personas(config.personas.clone()),
    )
}
