//! Canvas HTTP Client
//!
//! A simple, type-safe HTTP client for the Canvas orchestrator API.
//!
//! Every request except the health check carries the shared API key in the
//! `x-api-key` header.
//!
//! # Example
//!
//! ```no_run
//! use canvas_client::CanvasClient;
//! use canvas_core::domain::job::InferenceParameters;
//! use canvas_core::dto::job::SubmitInference;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CanvasClient::new("http://localhost:8080", "secret");
//!
//!     let submitted = client.submit_inference(&SubmitInference {
//!         endpoint_name: "sd-endpoint".to_string(),
//!         payload_ref: "s3://bucket/in1.png".to_string(),
//!         parameters: InferenceParameters {
//!             checkpoint: "v1-5-pruned-emaonly.safetensors".to_string(),
//!             sampler: "Euler a".to_string(),
//!             width: 512,
//!             height: 512,
//!             steps: Some(20),
//!             cfg_scale: None,
//!             seed: None,
//!             textual_inversions: vec![],
//!             loras: vec![],
//!             hypernetworks: vec![],
//!             controlnet_models: vec![],
//!         },
//!     }).await?;
//!
//!     println!("Submitted job: {}", submitted.job_id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod catalog;
mod endpoints;
mod jobs;
mod signals;
mod uploads;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for the Canvas orchestrator API
///
/// Methods are organized into logical groups:
/// - Inference job submission and queries
/// - Endpoint deployments
/// - Model catalogs and presigned uploads
/// - Completion signals (normally sent by the inference backend)
#[derive(Debug, Clone)]
pub struct CanvasClient {
    /// Base URL of the orchestrator (e.g., "http://localhost:8080")
    base_url: String,
    api_key: String,
    /// HTTP client instance
    client: Client,
}

impl CanvasClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the orchestrator API (e.g., "http://localhost:8080")
    /// * `api_key` - Shared secret sent as `x-api-key`
    ///
    /// # Example
    /// ```
    /// use canvas_client::CanvasClient;
    ///
    /// let client = CanvasClient::new("http://localhost:8080", "secret");
    /// ```
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(base_url, api_key, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Get the base URL of the orchestrator
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the orchestrator is up
    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Request Builders
    // =============================================================================

    fn get(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);
        self.client.get(url).header(API_KEY_HEADER, &self.api_key)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);
        self.client.post(url).header(API_KEY_HEADER, &self.api_key)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is not needed
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = CanvasClient::new("http://localhost:8080", "secret");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = CanvasClient::new("http://localhost:8080/", "secret");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_requests_carry_api_key() {
        let client = CanvasClient::new("http://localhost:8080", "secret");
        let request = client.get("/inference/get-lora-list").build().unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://localhost:8080/inference/get-lora-list"
        );
        assert_eq!(request.headers()[API_KEY_HEADER], "secret");
    }
}
