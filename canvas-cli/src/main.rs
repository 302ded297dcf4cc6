//! Canvas CLI
//!
//! Command-line interface for the Canvas inference orchestrator.

mod commands;
mod config;
mod id_resolver;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "canvas")]
#[command(about = "Canvas asynchronous inference CLI", long_about = None)]
struct Cli {
    /// Orchestrator URL
    #[arg(long, env = "CANVAS_URL", default_value = "http://localhost:8080")]
    url: String,

    /// API key sent as x-api-key
    #[arg(long, env = "CANVAS_API_KEY", hide_env_values = true)]
    api_key: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        orchestrator_url: cli.url,
        api_key: cli.api_key,
    };

    handle_command(cli.command, &config).await
}
