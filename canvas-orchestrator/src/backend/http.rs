//! HTTP implementation of the inference backend
//!
//! Talks to an asynchronous inference gateway:
//! - `POST {base}/endpoints/{name}/async-invocations`
//! - `POST {base}/endpoints`

use async_trait::async_trait;
use reqwest::Client;

use super::{AsyncInvocation, BackendError, EndpointProvisioning, InferenceBackend};

pub const INFERENCE_ID_HEADER: &str = "X-Amzn-SageMaker-Inference-Id";
pub const INPUT_LOCATION_HEADER: &str = "X-Amzn-SageMaker-InputLocation";

pub struct HttpInferenceBackend {
    client: Client,
    base_url: String,
}

impl HttpInferenceBackend {
    /// Creates a new HTTP backend
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the inference gateway (e.g., "http://gateway:9000")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn invocation_url(&self, endpoint_name: &str) -> String {
        format!("{}/endpoints/{}/async-invocations", self.base_url, endpoint_name)
    }

    pub fn endpoints_url(&self) -> String {
        format!("{}/endpoints", self.base_url)
    }

    async fn check(response: reqwest::Response) -> Result<(), BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(BackendError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl InferenceBackend for HttpInferenceBackend {
    async fn invoke_async(&self, invocation: &AsyncInvocation) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.invocation_url(&invocation.endpoint_name))
            .header(INFERENCE_ID_HEADER, invocation.correlation_token.to_string())
            .header(INPUT_LOCATION_HEADER, &invocation.input_location)
            .json(invocation)
            .send()
            .await?;

        Self::check(response).await
    }

    async fn start_endpoint_deployment(
        &self,
        request: &EndpointProvisioning,
    ) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.endpoints_url())
            .json(request)
            .send()
            .await?;

        Self::check(response).await
    }
}
