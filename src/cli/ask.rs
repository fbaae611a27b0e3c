//! `colony ask` - one turn from the terminal

use crate::server::{build_orchestrator, load_config, open_database, validate_config};
use anyhow::{Context, Result};
use clap::Args;
use colony_core::{format_error_for_cli, TurnRequest};
use colony_store::User;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Acting user id
    #[arg(long)]
    pub user: String,
    /// Acting user's role label
    #[arg(long, default_value = "")]
    pub role: String,
    /// Act as an administrator
    #[arg(long)]
    pub admin: bool,
    /// Thread to continue; a new one is started when omitted
    #[arg(long)]
    pub thread: Option<String>,
    /// Agent to talk to
    #[arg(long)]
    pub agent: Option<String>,
    /// Industry profile key
    #[arg(long)]
    pub industry: Option<String>,
    /// Persona profile key
    #[arg(long)]
    pub persona: Option<String>,
    /// Token budget for the answer
    #[arg(long)]
    pub max_tokens: Option<u32>,
    /// Message text
    #[arg(required = true)]
    pub prompt: Vec<String>,
}

impl AskArgs {
    pub fn prompt_text(&self) -> String {
        self.prompt.join(" ")
    }

    fn user(&self) -> User {
        User {
            id: self.user.clone(),
            role: self.role.clone(),
            is_admin: self.admin,
        }
    }

    fn request(&self) -> TurnRequest {
        TurnRequest {
            prompt: self.prompt_text(),
            thread_id: self
                .thread
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            agent_id: self.agent.clone(),
            system_instruction: None,
            max_tokens: self.max_tokens,
            industry: self.industry.clone(),
            persona: self.persona.clone(),
        }
    }
}

pub async fn run(args: AskArgs) -> Result<()> {
    let config = load_config().context("Failed to load configuration")?;
    validate_config(&config)?;
    let db = open_database(&config).await?;
    let orchestrator = build_orchestrator(&config, db).await?;

    let response = orchestrator
        .run_turn(&args.user(), args.request())
        .await
        .map_err(|e| anyhow::anyhow!(format_error_for_cli(&e)))?;

    println!("{}", response.answer);
    println!();
    println!(
        "thread: {} ({})",
        response.thread.thread.id, response.thread.thread.title
    );
    for agent in &response.provisioned_agents {
        println!("provisioned: {} [{}]", agent.name, agent.id);
    }
    Ok(())
}
