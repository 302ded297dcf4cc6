//! Presigned upload endpoint

use canvas_core::dto::upload::{PresignedUpload, UploadRequest};

use crate::CanvasClient;
use crate::error::Result;

impl CanvasClient {
    /// Ask for a time-limited PUT URL for `config/<name>.json`
    pub async fn presigned_upload_url(&self, name: &str) -> Result<PresignedUpload> {
        let response = self
            .get("/inference/generate-s3-presigned-url-for-uploading")
            .query(&UploadRequest {
                name: name.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }
}
