//! S3 presigner

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;

use super::{PresignError, Presigner};

pub struct S3Presigner {
    client: aws_sdk_s3::Client,
}

impl S3Presigner {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Builds a presigner from the ambient AWS configuration (env, profile, IMDS)
    pub async fn from_env() -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_s3::Client::new(&aws_config))
    }
}

#[async_trait]
impl Presigner for S3Presigner {
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, PresignError> {
        let request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config(expires_in)?)
            .await
            .map_err(|e| PresignError::Sdk(e.to_string()))?;

        Ok(request.uri().to_string())
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, PresignError> {
        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config(expires_in)?)
            .await
            .map_err(|e| PresignError::Sdk(e.to_string()))?;

        Ok(request.uri().to_string())
    }
}

fn presigning_config(expires_in: Duration) -> Result<PresigningConfig, PresignError> {
    PresigningConfig::expires_in(expires_in).map_err(|e| PresignError::InvalidExpiry(e.to_string()))
}
