//! Inference Backend
//!
//! The managed inference service is an opaque collaborator: we hand it a job
//! (by reference) and it later reports back through a completion signal.
//! Accepting a request is all this port promises.

pub mod http;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use canvas_core::domain::job::InferenceParameters;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use http::HttpInferenceBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend rejected the request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend did not answer within {0:?}")]
    Timeout(Duration),
}

/// Fire-and-forget invocation of an asynchronous inference endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsyncInvocation {
    /// Echoed back as `inferenceId` in the completion signal
    pub correlation_token: Uuid,
    pub endpoint_name: String,
    pub input_location: String,
    pub output_location: String,
    pub parameters: InferenceParameters,
}

/// Request to start provisioning an endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointProvisioning {
    pub deployment_id: Uuid,
    pub endpoint_name: String,
    pub instance_type: String,
    pub initial_instance_count: u32,
}

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Submit an asynchronous invocation; returns once the backend accepted it
    async fn invoke_async(&self, invocation: &AsyncInvocation) -> Result<(), BackendError>;

    /// Kick off endpoint provisioning; completion arrives as a deployment signal
    async fn start_endpoint_deployment(
        &self,
        request: &EndpointProvisioning,
    ) -> Result<(), BackendError>;
}

/// Run a backend call under a hard wall-clock limit
pub async fn with_deadline<F>(limit: Duration, call: F) -> Result<(), BackendError>
where
    F: Future<Output = Result<(), BackendError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(BackendError::Timeout(limit)),
    }
}
