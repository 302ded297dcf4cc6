//! Endpoint Deployment Service
//!
//! Records an endpoint deployment job and asks the backend to provision the
//! endpoint. Provisioning completes out of band through a deployment signal.

use canvas_core::domain::endpoint::{EndpointDeploymentJob, validate_endpoint_name};
use canvas_core::domain::status::JobStatus;
use canvas_core::dto::endpoint::{DEFAULT_INSTANCE_COUNT, DeployEndpoint, MAX_INSTANCE_COUNT};
use canvas_core::dto::job::SubmittedJob;
use canvas_core::dto::signal::{DeploymentSignal, SignalOutcome};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::{self, BackendError, EndpointProvisioning};
use crate::repository::StoreError;
use crate::service::completion;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("{0}")]
    Validation(String),

    #[error("failed to record deployment: {0}")]
    Persistence(#[source] StoreError),

    #[error("endpoint deployment {job_id} could not be started: {source}")]
    Provisioning {
        job_id: Uuid,
        /// False when the deployment record could not be moved to `failed`
        failure_recorded: bool,
        #[source]
        source: BackendError,
    },
}

pub async fn deploy(state: &AppState, req: DeployEndpoint) -> Result<SubmittedJob, DeploymentError> {
    validate_endpoint_name(&req.endpoint_name).map_err(DeploymentError::Validation)?;
    if req.instance_type.trim().is_empty() {
        return Err(DeploymentError::Validation(
            "instance_type is required".to_string(),
        ));
    }
    let count = req.initial_instance_count.unwrap_or(DEFAULT_INSTANCE_COUNT);
    if !(1..=MAX_INSTANCE_COUNT).contains(&count) {
        return Err(DeploymentError::Validation(format!(
            "initial_instance_count must be between 1 and {}",
            MAX_INSTANCE_COUNT
        )));
    }

    let job_id = Uuid::new_v4();
    let job = EndpointDeploymentJob::new(job_id, req.endpoint_name, req.instance_type, count);
    state
        .deployments
        .create(&job)
        .await
        .map_err(DeploymentError::Persistence)?;

    tracing::info!(
        "Endpoint deployment {} submitted for {} ({} x {})",
        job_id,
        job.endpoint_name,
        job.initial_instance_count,
        job.instance_type
    );

    let request = EndpointProvisioning {
        deployment_id: job_id,
        endpoint_name: job.endpoint_name.clone(),
        instance_type: job.instance_type.clone(),
        initial_instance_count: job.initial_instance_count,
    };

    let limit = state.config.invocation_timeout;
    if let Err(err) =
        backend::with_deadline(limit, state.backend.start_endpoint_deployment(&request)).await
    {
        tracing::warn!("Provisioning for deployment {} failed: {}", job_id, err);
        let signal = DeploymentSignal {
            endpoint_deployment_id: job_id,
            outcome: SignalOutcome::Failed,
            error_info: Some(err.to_string()),
        };
        let failure_recorded = match completion::handle_deployment_signal(state, signal).await {
            Ok(_) => true,
            Err(record_err) => {
                tracing::error!(
                    "Endpoint deployment {} left submitted, failure not recorded: {}",
                    job_id,
                    record_err
                );
                false
            }
        };
        return Err(DeploymentError::Provisioning {
            job_id,
            failure_recorded,
            source: err,
        });
    }

    match state
        .deployments
        .update(job_id, JobStatus::Submitted, &|job: &mut EndpointDeploymentJob| {
            job.mark_running()
        })
        .await
    {
        Ok(_) => tracing::info!("Endpoint deployment {} is running", job_id),
        Err(StoreError::Conflict { actual, .. }) => {
            tracing::debug!("Endpoint deployment {} already {}", job_id, actual)
        }
        Err(err) => tracing::warn!("Could not mark deployment {} running: {}", job_id, err),
    }

    Ok(SubmittedJob {
        job_id,
        status: JobStatus::Submitted,
    })
}
