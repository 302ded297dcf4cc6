//! Object storage
//!
//! Clients upload large payloads straight to the object store through
//! presigned URLs, then reference them by key. Results are fetched the same
//! way.

pub mod s3;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use s3::S3Presigner;

#[derive(Debug, Error)]
pub enum PresignError {
    #[error("invalid presign expiry: {0}")]
    InvalidExpiry(String),

    #[error("presigning failed: {0}")]
    Sdk(String),
}

#[async_trait]
pub trait Presigner: Send + Sync {
    /// URL granting a time-limited PUT on `bucket/key`
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, PresignError>;

    /// URL granting a time-limited GET on `bucket/key`
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, PresignError>;
}
