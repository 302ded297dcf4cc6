//! Inference command handlers
//!
//! Submitting jobs, viewing details and listing.

use anyhow::Result;
use canvas_client::CanvasClient;
use canvas_core::domain::job::{InferenceJob, InferenceParameters};
use canvas_core::dto::job::{RunInference, SubmitInference, SubmittedJob};
use clap::{Args, Subcommand};
use colored::*;

use crate::commands::colorize_status;
use crate::id_resolver::resolve_inference_job_id;
use crate::types::IdOrPrefix;

/// Generation parameters shared by `submit` and `run`
#[derive(Args)]
pub struct ParameterArgs {
    /// Model checkpoint
    #[arg(long)]
    checkpoint: String,

    /// Sampler name
    #[arg(long, default_value = "Euler a")]
    sampler: String,

    #[arg(long, default_value_t = 512)]
    width: u32,

    #[arg(long, default_value_t = 512)]
    height: u32,

    #[arg(long)]
    steps: Option<u32>,

    #[arg(long)]
    cfg_scale: Option<f32>,

    #[arg(long)]
    seed: Option<i64>,

    /// Textual inversion embedding (repeatable)
    #[arg(long = "textual-inversion")]
    textual_inversions: Vec<String>,

    /// LoRA model (repeatable)
    #[arg(long = "lora")]
    loras: Vec<String>,

    /// Hypernetwork (repeatable)
    #[arg(long = "hypernetwork")]
    hypernetworks: Vec<String>,

    /// ControlNet model (repeatable)
    #[arg(long = "controlnet")]
    controlnet_models: Vec<String>,
}

impl From<ParameterArgs> for InferenceParameters {
    fn from(args: ParameterArgs) -> Self {
        InferenceParameters {
            checkpoint: args.checkpoint,
            sampler: args.sampler,
            width: args.width,
            height: args.height,
            steps: args.steps,
            cfg_scale: args.cfg_scale,
            seed: args.seed,
            textual_inversions: args.textual_inversions,
            loras: args.loras,
            hypernetworks: args.hypernetworks,
            controlnet_models: args.controlnet_models,
        }
    }
}

/// Inference subcommands
#[derive(Subcommand)]
pub enum InferenceCommands {
    /// Submit a job against an uploaded payload
    Submit {
        /// Target endpoint name
        #[arg(long)]
        endpoint: String,

        /// Object reference of the input payload (s3://bucket/key)
        #[arg(long)]
        payload: String,

        #[command(flatten)]
        parameters: ParameterArgs,
    },
    /// Submit a job from an uploaded configuration blob
    Run {
        /// Target endpoint name
        #[arg(long)]
        endpoint: String,

        /// Configuration name (config/<name>.json), defaults to aigc
        #[arg(long)]
        config: Option<String>,

        #[command(flatten)]
        parameters: ParameterArgs,
    },
    /// Get job details
    Get {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Print a download URL for a succeeded job's result
    Output {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// List jobs
    List {
        /// Page size
        #[arg(long, default_value_t = 20)]
        limit: u32,

        /// Continue from a previous page
        #[arg(long)]
        page_token: Option<String>,
    },
}

/// Handle inference commands
pub async fn handle_inference_command(
    command: InferenceCommands,
    client: &CanvasClient,
) -> Result<()> {
    match command {
        InferenceCommands::Submit {
            endpoint,
            payload,
            parameters,
        } => {
            let req = SubmitInference {
                endpoint_name: endpoint,
                payload_ref: payload,
                parameters: parameters.into(),
            };
            let submitted = client.submit_inference(&req).await?;
            print_submitted(&submitted);
            Ok(())
        }
        InferenceCommands::Run {
            endpoint,
            config,
            parameters,
        } => {
            let req = RunInference {
                endpoint_name: endpoint,
                config_name: config,
                parameters: parameters.into(),
            };
            let submitted = client.run_inference(&req).await?;
            print_submitted(&submitted);
            Ok(())
        }
        InferenceCommands::Get { id } => get_job(client, &id).await,
        InferenceCommands::Output { id } => get_output(client, &id).await,
        InferenceCommands::List { limit, page_token } => list_jobs(client, page_token, limit).await,
    }
}

fn print_submitted(submitted: &SubmittedJob) {
    println!("{}", "✓ Inference job submitted".green().bold());
    println!("  ID:     {}", submitted.job_id.to_string().cyan());
    println!("  Status: {}", colorize_status(submitted.status));
}

/// Get and display a single job
async fn get_job(client: &CanvasClient, id: &str) -> Result<()> {
    let id_or_prefix = IdOrPrefix::parse(id);
    let uuid = resolve_inference_job_id(client, &id_or_prefix).await?;

    let job = client.get_inference_job(uuid).await?;

    print_job_details(&job);

    Ok(())
}

async fn get_output(client: &CanvasClient, id: &str) -> Result<()> {
    let uuid = resolve_inference_job_id(client, &IdOrPrefix::parse(id)).await?;

    let output = client.get_inference_job_output(uuid).await?;

    println!("{}", "Inference Output:".bold());
    println!("  Job:     {}", output.job_id.to_string().cyan());
    println!("  Result:  {}", output.result_ref.green());
    println!("  Expires: {}s", output.expires_in_secs);
    println!("
{}", output.download_url);

    Ok(())
}

async fn list_jobs(client: &CanvasClient, page_token: Option<String>, limit: u32) -> Result<()> {
    let page = client.list_inference_jobs(page_token, Some(limit)).await?;

    if page.items.is_empty() {
        println!("{}", "No inference jobs found.".yellow());
    } else {
        println!(
            "{}",
            format!("Found {} inference job(s):", page.items.len()).bold()
        );
        println!();
        for job in &page.items {
            print_job_summary(job);
        }
    }

    if let Some(token) = page.next_page_token {
        println!("{} --page-token {}", "More results:".dimmed(), token);
    }

    Ok(())
}

/// Print a job summary
fn print_job_summary(job: &InferenceJob) {
    println!("  {} Job {}", "▸".cyan(), job.id.to_string().dimmed());
    println!("    Endpoint: {}", job.endpoint_name);
    println!("    Status:   {}", colorize_status(job.status));
    println!(
        "    Created:  {}",
        job.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}

/// Print detailed job information
fn print_job_details(job: &InferenceJob) {
    println!("{}", "Inference Job Details:".bold());
    println!("  ID:        {}", job.id.to_string().cyan());
    println!("  Endpoint:  {}", job.endpoint_name);
    println!("  Status:    {}", colorize_status(job.status));
    println!("  Created:   {}", job.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Updated:   {}", job.updated_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Payload:   {}", job.request_payload_ref.dimmed());
    println!("  Output to: {}", job.output_location.dimmed());

    println!("\n{}", "Parameters:".bold());
    match serde_json::to_string_pretty(&job.parameters) {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{:?}", job.parameters),
    }

    if let Some(result) = &job.result_payload_ref {
        println!("\n{}", "Result:".bold());
        println!("  {}", result.green());
    }

    if let Some(error) = &job.error_info {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }
}
