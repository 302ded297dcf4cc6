//! Configuration module
//!
//! Handles CLI configuration: where the orchestrator lives and how to
//! authenticate against it.

use canvas_client::CanvasClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the orchestrator service
    pub orchestrator_url: String,
    pub api_key: String,
}

impl Config {
    pub fn client(&self) -> CanvasClient {
        CanvasClient::new(&self.orchestrator_url, &self.api_key)
    }
}
