//! CLI module for Colony
//!
//! Provides commands:
//! - `serve`: run the HTTP server (default)
//! - `seed`: migrate the database and insert the platform agents
//! - `ask`: run one conversational turn from the terminal

use clap::{Parser, Subcommand};

pub mod ask;
pub mod seed;

/// Colony agent hub CLI
#[derive(Parser, Debug)]
#[command(name = "colony")]
#[command(about = "Multi-tenant agent hub with conversational agent provisioning")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default)
    Serve,
    /// Run migrations and seed the default agents
    Seed,
    /// Send one message and print the answer
    Ask(ask::AskArgs),
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Seed) => seed::run().await,
        Some(Commands::Ask(args)) => ask::run(args).await,
        Some(Commands::Serve) | None => crate::server::run().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["colony"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_ask_arguments() {
        let cli = Cli::try_parse_from([
            "colony", "ask", "--user", "alice", "--role", "marketing", "--thread", "t1",
            "create", "an", "agent",
        ])
        .unwrap();
        let Some(Commands::Ask(args)) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.user, "alice");
        assert_eq!(args.role, "marketing");
        assert_eq!(args.thread.as_deref(), Some("t1"));
        assert_eq!(args.prompt_text(), "create an agent");
        assert!(!args.admin);
    }

    #[test]
    fn test_ask_requires_user() {
        assert!(Cli::try_parse_from(["colony", "ask", "hello"]).is_err());
    }
}
