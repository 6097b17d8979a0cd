//! CLI surface
//!
//! - `aura run`: the voice loop (default when no subcommand is given)
//! - `aura dispatch <TEXT>`: interpret and dispatch one typed command

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// AURA voice assistant CLI
#[derive(Parser, Debug)]
#[command(name = "aura")]
#[command(about = "Voice-driven desktop assistant")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Listen for the wake phrase and dispatch spoken commands (default)
    Run,
    /// Interpret and dispatch a single typed command, then exit
    Dispatch {
        /// The command text, as it would have been spoken
        text: Vec<String>,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = crate::config::AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Dispatch { text }) => {
            let agent = crate::agent::Agent::new(&config)?;
            let transcript = text.join(" ");
            let result = agent.dispatch_text(&transcript).await;
            println!("{result}");
            Ok(())
        }
        Some(Commands::Run) | None => {
            info!("starting AURA v{}", env!("CARGO_PKG_VERSION"));
            let agent = crate::agent::Agent::new(&config)?;
            agent.run_voice_loop(&config.voice).await
        }
    }
}
