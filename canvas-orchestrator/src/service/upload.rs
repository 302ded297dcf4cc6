//! Presigned Upload Service
//!
//! Hands out time-limited PUT URLs for configuration blobs under `config/`.

use canvas_core::domain::object_key::{self, ObjectKeyError};
use canvas_core::dto::upload::PresignedUpload;
use thiserror::Error;

use crate::state::AppState;
use crate::storage::PresignError;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("presigned uploads are unavailable: no S3 bucket is configured")]
    Unavailable,

    #[error(transparent)]
    InvalidName(#[from] ObjectKeyError),

    #[error(transparent)]
    Presign(#[from] PresignError),
}

pub async fn presign_config_upload(
    state: &AppState,
    name: &str,
) -> Result<PresignedUpload, UploadError> {
    let (Some(bucket), Some(presigner)) = (&state.config.s3_bucket, &state.presigner) else {
        return Err(UploadError::Unavailable);
    };

    let key = object_key::config_key(name)?;
    let expires_in = state.config.presign_expiry;
    let url = presigner.presign_put(bucket, &key, expires_in).await?;

    tracing::debug!("Presigned upload for s3://{}/{}", bucket, key);

    Ok(PresignedUpload {
        key,
        url,
        expires_in_secs: expires_in.as_secs(),
    })
}
