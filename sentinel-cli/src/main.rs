//! Sentinel CLI
//!
//! Command-line interface for the Sentinel verification dashboard.

mod api;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(about = "Sentinel vehicle identity verification CLI", long_about = None)]
struct Cli {
    /// Dashboard server URL
    #[arg(long, env = "SENTINEL_SERVER_URL", default_value = "http://localhost:8080")]
    server_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server_url,
    };

    handle_command(cli.command, &config).await
}
