//! Model catalog command

use anyhow::{Result, anyhow};
use canvas_client::CanvasClient;
use canvas_core::domain::catalog::ModelKind;
use colored::*;

pub async fn list_models(client: &CanvasClient, kind: &str) -> Result<()> {
    let kind: ModelKind = kind.parse().map_err(|e: String| anyhow!(e))?;
    let list = client.list_models(kind).await?;

    if list.models.is_empty() {
        println!("{}", format!("No {} models configured.", kind).yellow());
        return Ok(());
    }

    println!("{}", format!("{} {} model(s):", list.models.len(), kind).bold());
    for model in &list.models {
        println!("  {} {}", "▸".cyan(), model);
    }
    Ok(())
}
