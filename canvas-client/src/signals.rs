//! Completion signal endpoints
//!
//! The inference backend normally delivers these; the client methods exist
//! for development setups without one.

use canvas_core::dto::signal::{AsyncInferenceNotification, DeploymentSignal, SignalAck};

use crate::CanvasClient;
use crate::error::Result;

impl CanvasClient {
    /// Deliver an asynchronous inference notification
    pub async fn send_completion_signal(
        &self,
        notification: &AsyncInferenceNotification,
    ) -> Result<SignalAck> {
        let response = self
            .post("/inference/completion-signal")
            .json(notification)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Deliver an endpoint provisioning outcome
    pub async fn send_deployment_signal(&self, signal: &DeploymentSignal) -> Result<SignalAck> {
        let response = self
            .post("/inference/endpoint-deployment-signal")
            .json(signal)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
