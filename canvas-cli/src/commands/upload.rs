//! Presigned upload command

use anyhow::Result;
use canvas_client::CanvasClient;
use colored::*;

pub async fn presigned_url(client: &CanvasClient, name: &str) -> Result<()> {
    let upload = client.presigned_upload_url(name).await?;

    println!("{}", "Upload with an HTTP PUT to:".bold());
    println!("{}", upload.url);
    println!(
        "{}",
        format!(
            "Key {} (expires in {}s)",
            upload.key, upload.expires_in_secs
        )
        .dimmed()
    );
    Ok(())
}
