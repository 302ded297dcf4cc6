//! ID resolver module
//!
//! Handles resolution of UUID prefixes to full UUIDs by querying the API.
//! This allows users to specify short, unambiguous prefixes instead of full UUIDs.

use anyhow::{Context, Result, anyhow};
use canvas_client::CanvasClient;
use uuid::Uuid;

use crate::types::IdOrPrefix;

/// Page size used while scanning listings
const SCAN_PAGE_SIZE: u32 = 100;

/// Resolve an inference job ID or prefix to a full UUID
///
/// If the input is already a full UUID, returns it immediately.
/// Otherwise, pages through every inference job looking for the prefix.
///
/// # Errors
/// Returns an error if:
/// - No job matches the prefix
/// - Multiple jobs match the prefix (ambiguous)
/// - API call fails
pub async fn resolve_inference_job_id(
    client: &CanvasClient,
    id_or_prefix: &IdOrPrefix,
) -> Result<Uuid> {
    if let Some(uuid) = id_or_prefix.as_uuid() {
        return Ok(uuid);
    }

    let mut ids = Vec::new();
    let mut token = None;
    loop {
        let page = client
            .list_inference_jobs(token, Some(SCAN_PAGE_SIZE))
            .await
            .context("Failed to fetch inference jobs for ID resolution")?;
        ids.extend(page.items.iter().map(|job| job.id));
        match page.next_page_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    match_prefix(&id_or_prefix.as_str(), ids, "inference job")
}

/// Resolve an endpoint deployment ID or prefix to a full UUID
pub async fn resolve_deployment_id(
    client: &CanvasClient,
    id_or_prefix: &IdOrPrefix,
) -> Result<Uuid> {
    if let Some(uuid) = id_or_prefix.as_uuid() {
        return Ok(uuid);
    }

    let mut ids = Vec::new();
    let mut token = None;
    loop {
        let page = client
            .list_endpoint_deployment_jobs(token, Some(SCAN_PAGE_SIZE))
            .await
            .context("Failed to fetch endpoint deployments for ID resolution")?;
        ids.extend(page.items.iter().map(|job| job.id));
        match page.next_page_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    match_prefix(&id_or_prefix.as_str(), ids, "endpoint deployment")
}

/// Pick the single id starting with `prefix`
fn match_prefix(prefix: &str, ids: Vec<Uuid>, what: &str) -> Result<Uuid> {
    let prefix = prefix.to_lowercase();
    let matches: Vec<Uuid> = ids
        .into_iter()
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => Err(anyhow!("No {} found with ID starting with '{}'", what, prefix)),
        1 => Ok(matches[0]),
        _ => {
            let ids: Vec<String> = matches.iter().map(Uuid::to_string).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple {}s: {}",
                prefix,
                what,
                ids.join(", ")
            ))
        }
    }
}
