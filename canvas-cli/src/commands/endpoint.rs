//! Endpoint deployment command handlers

use anyhow::Result;
use canvas_client::CanvasClient;
use canvas_core::domain::endpoint::EndpointDeploymentJob;
use canvas_core::dto::endpoint::DeployEndpoint;
use clap::Subcommand;
use colored::*;

use crate::commands::colorize_status;
use crate::id_resolver::resolve_deployment_id;
use crate::types::IdOrPrefix;

/// Endpoint subcommands
#[derive(Subcommand)]
pub enum EndpointCommands {
    /// Start provisioning an endpoint
    Deploy {
        /// Endpoint name
        name: String,

        /// Instance type, e.g. ml.g4dn.xlarge
        #[arg(long)]
        instance_type: String,

        /// Initial instance count (1-10)
        #[arg(long)]
        count: Option<u32>,
    },
    /// Get deployment details
    Get {
        /// Deployment ID or unambiguous prefix
        id: String,
    },
    /// List deployments
    List {
        #[arg(long, default_value_t = 20)]
        limit: u32,

        #[arg(long)]
        page_token: Option<String>,
    },
}

pub async fn handle_endpoint_command(command: EndpointCommands, client: &CanvasClient) -> Result<()> {
    match command {
        EndpointCommands::Deploy {
            name,
            instance_type,
            count,
        } => {
            let submitted = client
                .deploy_endpoint(&DeployEndpoint {
                    endpoint_name: name,
                    instance_type,
                    initial_instance_count: count,
                })
                .await?;
            println!("{}", "✓ Endpoint deployment started".green().bold());
            println!("  ID:     {}", submitted.job_id.to_string().cyan());
            println!("  Status: {}", colorize_status(submitted.status));
            Ok(())
        }
        EndpointCommands::Get { id } => {
            let uuid = resolve_deployment_id(client, &IdOrPrefix::parse(&id)).await?;
            let job = client.get_endpoint_deployment_job(uuid).await?;
            print_deployment(&job);
            Ok(())
        }
        EndpointCommands::List { limit, page_token } => {
            let page = client
                .list_endpoint_deployment_jobs(page_token, Some(limit))
                .await?;
            if page.items.is_empty() {
                println!("{}", "No endpoint deployments found.".yellow());
            }
            for job in &page.items {
                println!(
                    "  {} {} {} [{}]",
                    "▸".cyan(),
                    job.id.to_string().dimmed(),
                    job.endpoint_name,
                    colorize_status(job.status)
                );
            }
            if let Some(token) = page.next_page_token {
                println!("{} --page-token {}", "More results:".dimmed(), token);
            }
            Ok(())
        }
    }
}

fn print_deployment(job: &EndpointDeploymentJob) {
    println!("{}", "Endpoint Deployment Details:".bold());
    println!("  ID:        {}", job.id.to_string().cyan());
    println!("  Endpoint:  {}", job.endpoint_name);
    println!("  Status:    {}", colorize_status(job.status));
    println!(
        "  Instances: {} x {}",
        job.initial_instance_count, job.instance_type
    );
    println!("  Created:   {}", job.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Updated:   {}", job.updated_at.format("%Y-%m-%d %H:%M:%S"));

    if let Some(error) = &job.error_info {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }
}
