//! Completion signal DTOs
//!
//! The inference backend reports the outcome of an asynchronous invocation
//! with a notification carrying `inferenceId` (our job id, used as the
//! correlation token), `invocationStatus` and either the output location or a
//! failure reason. Delivery is at-least-once, either raw or wrapped in an SNS
//! HTTP envelope.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Outcome carried by a completion signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalOutcome {
    Succeeded,
    Failed,
}

/// Normalized completion signal for an inference job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSignal {
    pub correlation_token: Uuid,
    pub outcome: SignalOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_info: Option<String>,
}

impl CompletionSignal {
    pub fn succeeded(correlation_token: Uuid, result_ref: impl Into<String>) -> Self {
        Self {
            correlation_token,
            outcome: SignalOutcome::Succeeded,
            result_ref: Some(result_ref.into()),
            error_info: None,
        }
    }

    pub fn failed(correlation_token: Uuid, error_info: impl Into<String>) -> Self {
        Self {
            correlation_token,
            outcome: SignalOutcome::Failed,
            result_ref: None,
            error_info: Some(error_info.into()),
        }
    }
}

/// Completion signal for an endpoint deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentSignal {
    pub endpoint_deployment_id: Uuid,
    pub outcome: SignalOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_info: Option<String>,
}

/// How the orchestrator disposed of a delivered signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acknowledgement {
    Applied,
    AlreadyTerminal,
    /// Accepted but not applicable: control traffic, unknown job, or a
    /// payload that redelivery would not fix
    Ignored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalAck {
    pub disposition: Acknowledgement,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("malformed signal: {0}")]
    Malformed(String),

    #[error("correlation token '{0}' is not a job id")]
    InvalidCorrelationToken(String),

    #[error("unsupported invocation status '{0}'")]
    UnsupportedStatus(String),
}

/// Notification format emitted by the asynchronous inference endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncInferenceNotification {
    pub invocation_status: String,
    pub inference_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_parameters: Option<RequestParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_parameters: Option<ResponseParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestParameters {
    #[serde(default)]
    pub endpoint_name: Option<String>,
    #[serde(default)]
    pub input_location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseParameters {
    #[serde(default)]
    pub output_location: Option<String>,
}

pub const STATUS_COMPLETED: &str = "Completed";
pub const STATUS_FAILED: &str = "Failed";

impl TryFrom<AsyncInferenceNotification> for CompletionSignal {
    type Error = SignalError;

    fn try_from(n: AsyncInferenceNotification) -> Result<Self, Self::Error> {
        let token = Uuid::parse_str(n.inference_id.trim())
            .map_err(|_| SignalError::InvalidCorrelationToken(n.inference_id.clone()))?;

        match n.invocation_status.as_str() {
            // without an output location the job's own output location stands in
            STATUS_COMPLETED => Ok(CompletionSignal {
                correlation_token: token,
                outcome: SignalOutcome::Succeeded,
                result_ref: n
                    .response_parameters
                    .and_then(|p| p.output_location)
                    .filter(|loc| !loc.is_empty()),
                error_info: None,
            }),
            STATUS_FAILED => {
                let reason = n
                    .failure_reason
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| "inference failed without a reason".to_string());
                Ok(CompletionSignal::failed(token, reason))
            }
            other => Err(SignalError::UnsupportedStatus(other.to_string())),
        }
    }
}

/// SNS HTTP(S) delivery envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnsEnvelope {
    #[serde(rename = "Type")]
    pub message_type: String,
    #[serde(rename = "MessageId", default)]
    pub message_id: Option<String>,
    #[serde(rename = "TopicArn", default)]
    pub topic_arn: Option<String>,
    #[serde(rename = "Message")]
    pub message: String,
}

/// Body accepted by the completion-signal route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InboundSignal {
    Sns(SnsEnvelope),
    Direct(AsyncInferenceNotification),
}

impl InboundSignal {
    /// Unwrap into a completion signal. `Ok(None)` means the delivery is
    /// control traffic (e.g. a subscription confirmation) with no job outcome.
    pub fn into_completion_signal(self) -> Result<Option<CompletionSignal>, SignalError> {
        match self {
            InboundSignal::Direct(notification) => notification.try_into().map(Some),
            InboundSignal::Sns(envelope) => {
                if envelope.message_type != "Notification" {
                    return Ok(None);
                }
                let notification: AsyncInferenceNotification =
                    serde_json::from_str(&envelope.message)
                        .map_err(|e| SignalError::Malformed(e.to_string()))?;
                notification.try_into().map(Some)
            }
        }
    }
}
