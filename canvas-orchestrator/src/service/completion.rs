//! Completion Notifier
//!
//! Applies asynchronous outcome signals to job records and fans the result
//! out to the notification channel.
//!
//! Signals arrive at-least-once and may race each other, so every write is a
//! compare-and-set on the status we just read. A record that is already
//! terminal is left alone; its notification is published again.

use canvas_core::domain::endpoint::EndpointDeploymentJob;
use canvas_core::domain::job::InferenceJob;
use canvas_core::domain::record::JobRecord;
use canvas_core::domain::status::JobStatus;
use canvas_core::dto::notification::JobNotification;
use canvas_core::dto::signal::{CompletionSignal, DeploymentSignal, SignalOutcome};
use thiserror::Error;
use uuid::Uuid;

use crate::repository::{Mutator, RecordStore, StoreError};
use crate::state::AppState;

/// Status can rise at most twice, so a third conflict means something is wrong
const MAX_CAS_ATTEMPTS: usize = 3;

const NO_REASON: &str = "inference failed without a reason";

/// What a signal did to its record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalDisposition {
    Applied,
    AlreadyTerminal,
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("no job matches correlation token {0}")]
    UnknownCorrelation(Uuid),

    #[error("job {id} could not be updated: {source}")]
    Persistence {
        id: Uuid,
        #[source]
        source: StoreError,
    },
}

// =============================================================================
// Inference Jobs
// =============================================================================

/// Apply a completion signal to the inference job it correlates to
pub async fn handle_inference_signal(
    state: &AppState,
    signal: CompletionSignal,
) -> Result<SignalDisposition, CompletionError> {
    let id = signal.correlation_token;
    let outcome = signal.outcome;
    let result_ref = signal.result_ref;
    let error_info = signal
        .error_info
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| NO_REASON.to_string());

    let mutator = |job: &mut InferenceJob| match outcome {
        SignalOutcome::Succeeded => {
            let result = result_ref
                .clone()
                .unwrap_or_else(|| job.output_location.clone());
            job.mark_succeeded(result)
        }
        SignalOutcome::Failed => job.mark_failed(error_info.clone()),
    };

    let (job, disposition) = match settle(state.inference_jobs.as_ref(), id, &mutator).await {
        Ok(settled) => settled,
        Err(err) => {
            tracing::error!("Dropping {:?} signal: {}", outcome, err);
            return Err(err);
        }
    };

    log_disposition(id, outcome, job.status, disposition);

    if let Some(notification) = inference_notification(&job) {
        publish(state, &notification).await;
    }

    Ok(disposition)
}

fn inference_notification(job: &InferenceJob) -> Option<JobNotification> {
    match job.status {
        JobStatus::Succeeded => Some(JobNotification::inference_succeeded(
            job.id,
            job.result_payload_ref.as_deref().unwrap_or(&job.output_location),
        )),
        JobStatus::Failed => Some(JobNotification::inference_failed(
            job.id,
            job.error_info.as_deref().unwrap_or(NO_REASON),
        )),
        _ => None,
    }
}

// =============================================================================
// Endpoint Deployments
// =============================================================================

/// Apply a provisioning outcome to an endpoint deployment job
pub async fn handle_deployment_signal(
    state: &AppState,
    signal: DeploymentSignal,
) -> Result<SignalDisposition, CompletionError> {
    let id = signal.endpoint_deployment_id;
    let outcome = signal.outcome;
    let error_info = signal
        .error_info
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "endpoint deployment failed without a reason".to_string());

    let mutator = |job: &mut EndpointDeploymentJob| match outcome {
        SignalOutcome::Succeeded => job.mark_succeeded(),
        SignalOutcome::Failed => job.mark_failed(error_info.clone()),
    };

    let (job, disposition) = match settle(state.deployments.as_ref(), id, &mutator).await {
        Ok(settled) => settled,
        Err(err) => {
            tracing::error!("Dropping {:?} deployment signal: {}", outcome, err);
            return Err(err);
        }
    };

    log_disposition(id, outcome, job.status, disposition);

    let notification = match job.status {
        JobStatus::Succeeded => Some(JobNotification::deployment_succeeded(
            job.id,
            &job.endpoint_name,
        )),
        JobStatus::Failed => Some(JobNotification::deployment_failed(
            job.id,
            &job.endpoint_name,
            job.error_info.as_deref().unwrap_or("unknown error"),
        )),
        _ => None,
    };
    if let Some(notification) = notification {
        publish(state, &notification).await;
    }

    Ok(disposition)
}

// =============================================================================
// Helpers
// =============================================================================

/// Drive a record to a terminal state with a bounded compare-and-set loop
async fn settle<T: JobRecord>(
    store: &dyn RecordStore<T>,
    id: Uuid,
    mutator: Mutator<'_, T>,
) -> Result<(T, SignalDisposition), CompletionError> {
    let mut last_conflict = None;

    for _ in 0..MAX_CAS_ATTEMPTS {
        let current = store.get(id).await.map_err(|err| match err {
            StoreError::NotFound(_) => CompletionError::UnknownCorrelation(id),
            other => CompletionError::Persistence { id, source: other },
        })?;

        if current.status().is_terminal() {
            return Ok((current, SignalDisposition::AlreadyTerminal));
        }

        match store.update(id, current.status(), mutator).await {
            Ok(updated) => return Ok((updated, SignalDisposition::Applied)),
            Err(conflict @ StoreError::Conflict { .. }) => {
                tracing::debug!("Job {} changed underneath us, retrying", id);
                last_conflict = Some(conflict);
            }
            Err(StoreError::NotFound(_)) => return Err(CompletionError::UnknownCorrelation(id)),
            Err(other) => return Err(CompletionError::Persistence { id, source: other }),
        }
    }

    let source = last_conflict.unwrap_or(StoreError::NotFound(id));
    Err(CompletionError::Persistence { id, source })
}

fn log_disposition(id: Uuid, outcome: SignalOutcome, status: JobStatus, disposition: SignalDisposition) {
    match disposition {
        SignalDisposition::Applied => tracing::info!("Job {} is now {}", id, status),
        SignalDisposition::AlreadyTerminal => tracing::debug!(
            "Ignoring duplicate {:?} signal for job {} (already {})",
            outcome,
            id,
            status
        ),
    }
}

async fn publish(state: &AppState, notification: &JobNotification) {
    if let Err(err) = state.notifier.publish(notification).await {
        tracing::warn!(
            "Failed to publish notification for job {}: {}",
            notification.job_id,
            err
        );
    }
}
