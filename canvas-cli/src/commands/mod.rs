//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod endpoint;
mod inference;
mod models;
mod signal;
mod upload;

pub use endpoint::EndpointCommands;
pub use inference::InferenceCommands;
pub use signal::SignalCommands;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use canvas_core::domain::status::JobStatus;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Inference job submission and queries
    Inference {
        #[command(subcommand)]
        command: InferenceCommands,
    },
    /// Endpoint deployments
    Endpoint {
        #[command(subcommand)]
        command: EndpointCommands,
    },
    /// List add-on models (textual-inversion, lora, hypernetwork, controlnet)
    Models {
        /// Model kind
        kind: String,
    },
    /// Get a presigned URL for uploading a configuration blob
    UploadUrl {
        /// Configuration name; the object lands at config/<name>.json
        #[arg(default_value = "aigc")]
        name: String,
    },
    /// Deliver completion signals by hand (development without a backend)
    Signal {
        #[command(subcommand)]
        command: SignalCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        Commands::Inference { command } => {
            inference::handle_inference_command(command, &client).await
        }
        Commands::Endpoint { command } => endpoint::handle_endpoint_command(command, &client).await,
        Commands::Models { kind } => models::list_models(&client, &kind).await,
        Commands::UploadUrl { name } => upload::presigned_url(&client, &name).await,
        Commands::Signal { command } => signal::handle_signal_command(command, &client).await,
    }
}

/// Colorize job status for display
pub(crate) fn colorize_status(status: JobStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        JobStatus::Submitted => status_str.yellow(),
        JobStatus::Running => status_str.cyan(),
        JobStatus::Succeeded => status_str.green(),
        JobStatus::Failed => status_str.red(),
    }
}
