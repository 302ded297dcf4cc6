//! Completion Signal API Handlers
//!
//! Inbound end of the asynchronous path. There is nobody to report errors to
//! but the delivery mechanism, so only failures worth a redelivery (the store
//! being unavailable) produce an error status. Everything else is
//! acknowledged and logged.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use canvas_core::dto::signal::{Acknowledgement, DeploymentSignal, InboundSignal, SignalAck};

use crate::api::error::{ApiError, ApiResult};
use crate::service::completion_service::{self, CompletionError, SignalDisposition};
use crate::state::AppState;

impl From<SignalDisposition> for Acknowledgement {
    fn from(disposition: SignalDisposition) -> Self {
        match disposition {
            SignalDisposition::Applied => Acknowledgement::Applied,
            SignalDisposition::AlreadyTerminal => Acknowledgement::AlreadyTerminal,
        }
    }
}

type AckResponse = ApiResult<(StatusCode, Json<SignalAck>)>;

fn ack(disposition: Acknowledgement) -> AckResponse {
    Ok((StatusCode::ACCEPTED, Json(SignalAck { disposition })))
}

fn settle(result: Result<SignalDisposition, CompletionError>) -> AckResponse {
    match result {
        Ok(disposition) => ack(disposition.into()),
        // logged by the completion service, redelivery cannot help
        Err(CompletionError::UnknownCorrelation(_)) => ack(Acknowledgement::Ignored),
        Err(err @ CompletionError::Persistence { .. }) => Err(ApiError::Unavailable(err.to_string())),
    }
}

/// POST /inference/completion-signal
/// Asynchronous inference outcome, raw or in an SNS envelope
pub async fn completion_signal(
    State(state): State<AppState>,
    payload: Result<Json<InboundSignal>, JsonRejection>,
) -> AckResponse {
    let Json(inbound) = payload?;

    let signal = match inbound.into_completion_signal() {
        Ok(Some(signal)) => signal,
        Ok(None) => {
            tracing::info!("Acknowledged control message on the completion channel");
            return ack(Acknowledgement::Ignored);
        }
        Err(err) => {
            tracing::error!("Unusable completion signal: {}", err);
            return ack(Acknowledgement::Ignored);
        }
    };

    tracing::debug!(
        "Completion signal for job {}: {:?}",
        signal.correlation_token,
        signal.outcome
    );
    settle(completion_service::handle_inference_signal(&state, signal).await)
}

/// POST /inference/endpoint-deployment-signal
pub async fn endpoint_deployment_signal(
    State(state): State<AppState>,
    payload: Result<Json<DeploymentSignal>, JsonRejection>,
) -> AckResponse {
    let Json(signal) = payload?;
    settle(completion_service::handle_deployment_signal(&state, signal).await)
}
