//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod analysis;
mod session;
mod snapshot;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use sentinel_core::domain::session::Checkpoint;

use crate::api::ApiClient;
use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Upload images to a checkpoint (directories expand to their images)
    Upload {
        /// entry or exit
        #[arg(value_parser = parse_checkpoint)]
        checkpoint: Checkpoint,

        /// Image files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List snapshots staged on a checkpoint
    Snapshots {
        /// entry or exit
        #[arg(value_parser = parse_checkpoint)]
        checkpoint: Checkpoint,
    },
    /// Run the analysis on the staged snapshots
    Analyze,
    /// Show results of the last analysis
    Results,
    /// Show session statistics
    Stats,
    /// Show pipeline output
    Logs,
    /// Show session status
    Status,
    /// Clear the session
    Clear,
    /// Clear, upload both batches, analyze and print the report
    Audit {
        /// Directory or file with entry captures
        #[arg(long)]
        entry: PathBuf,

        /// Directory or file with exit captures
        #[arg(long)]
        exit: PathBuf,

        /// Keep the current session instead of clearing it first
        #[arg(long)]
        keep: bool,
    },
}

fn parse_checkpoint(raw: &str) -> std::result::Result<Checkpoint, String> {
    raw.parse()
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.server_url);

    match command {
        Commands::Upload { checkpoint, paths } => {
            snapshot::upload(&client, checkpoint, &paths).await
        }
        Commands::Snapshots { checkpoint } => snapshot::list(&client, checkpoint).await,
        Commands::Analyze => analysis::analyze(&client).await,
        Commands::Results => analysis::results(&client).await,
        Commands::Stats => session::stats(&client).await,
        Commands::Logs => session::logs(&client).await,
        Commands::Status => session::status(&client).await,
        Commands::Clear => session::clear(&client).await,
        Commands::Audit { entry, exit, keep } => {
            analysis::audit(&client, &entry, &exit, keep).await
        }
    }
}
