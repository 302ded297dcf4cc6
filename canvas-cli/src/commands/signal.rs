//! Signal command handlers
//!
//! Stand in for the inference backend when there is none: deliver the
//! notification it would have sent.

use anyhow::Result;
use canvas_client::CanvasClient;
use canvas_core::dto::signal::{
    AsyncInferenceNotification, DeploymentSignal, ResponseParameters, STATUS_COMPLETED,
    STATUS_FAILED, SignalAck, SignalOutcome,
};
use clap::Subcommand;
use colored::*;

use crate::id_resolver::{resolve_deployment_id, resolve_inference_job_id};
use crate::types::IdOrPrefix;

#[derive(Subcommand)]
pub enum SignalCommands {
    /// Report an inference job as completed
    Complete {
        /// Job ID or unambiguous prefix
        id: String,

        /// Where the result was written
        #[arg(long)]
        output: String,
    },
    /// Report an inference job as failed
    Fail {
        /// Job ID or unambiguous prefix
        id: String,

        #[arg(long, default_value = "failed by operator")]
        reason: String,
    },
    /// Report an endpoint deployment outcome
    Deployment {
        /// Deployment ID or unambiguous prefix
        id: String,

        /// Mark the deployment failed with this reason instead of succeeded
        #[arg(long)]
        failed: Option<String>,
    },
}

pub async fn handle_signal_command(command: SignalCommands, client: &CanvasClient) -> Result<()> {
    let ack = match command {
        SignalCommands::Complete { id, output } => {
            let uuid = resolve_inference_job_id(client, &IdOrPrefix::parse(&id)).await?;
            let notification = AsyncInferenceNotification {
                invocation_status: STATUS_COMPLETED.to_string(),
                inference_id: uuid.to_string(),
                request_parameters: None,
                response_parameters: Some(ResponseParameters {
                    output_location: Some(output),
                }),
                failure_reason: None,
            };
            client.send_completion_signal(&notification).await?
        }
        SignalCommands::Fail { id, reason } => {
            let uuid = resolve_inference_job_id(client, &IdOrPrefix::parse(&id)).await?;
            let notification = AsyncInferenceNotification {
                invocation_status: STATUS_FAILED.to_string(),
                inference_id: uuid.to_string(),
                request_parameters: None,
                response_parameters: None,
                failure_reason: Some(reason),
            };
            client.send_completion_signal(&notification).await?
        }
        SignalCommands::Deployment { id, failed } => {
            let uuid = resolve_deployment_id(client, &IdOrPrefix::parse(&id)).await?;
            let signal = DeploymentSignal {
                endpoint_deployment_id: uuid,
                outcome: if failed.is_some() {
                    SignalOutcome::Failed
                } else {
                    SignalOutcome::Succeeded
                },
                error_info: failed,
            };
            client.send_deployment_signal(&signal).await?
        }
    };

    print_ack(&ack);
    Ok(())
}

fn print_ack(ack: &SignalAck) {
    let disposition = format!("{:?}", ack.disposition);
    println!("{} {}", "Signal acknowledged:".bold(), disposition.cyan());
}
