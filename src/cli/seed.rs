//! `colony seed`

use crate::server::{load_config, open_database};
use anyhow::{Context, Result};
use colony_store::AgentCatalog;

pub async fn run() -> Result<()> {
    let config = load_config().context("Failed to load configuration")?;
    let db = open_database(&config).await?;

    let inserted = AgentCatalog::new(db)
        .seed_defaults()
        .await
        .context("Failed to seed default agents")?;

    if inserted == 0 {
        println!("Default agents already present.");
    } else {
        println!("Seeded {} default agent(s).", inserted);
    }
    Ok(())
}
