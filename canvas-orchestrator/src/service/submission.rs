//! Submission Handler
//!
//! Validates a job request, persists the `submitted` record and fires the
//! asynchronous inference call. Exactly one downstream invocation follows
//! each record creation; nothing is invoked when creation fails.

use canvas_core::domain::catalog::{ModelCatalog, ModelKind};
use canvas_core::domain::endpoint::validate_endpoint_name;
use canvas_core::domain::job::{InferenceJob, InferenceParameters};
use canvas_core::domain::object_key::{self, DEFAULT_CONFIG_NAME};
use canvas_core::domain::status::JobStatus;
use canvas_core::dto::job::{RunInference, SubmitInference, SubmittedJob};
use canvas_core::dto::signal::CompletionSignal;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::{self, AsyncInvocation, BackendError};
use crate::repository::StoreError;
use crate::service::completion;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("failed to record job: {0}")]
    Persistence(#[source] StoreError),

    #[error("inference job {job_id} could not be started: {source}")]
    DownstreamInvocation {
        job_id: Uuid,
        /// False when the store refused the `failed` write and the record
        /// is still `submitted`
        failure_recorded: bool,
        #[source]
        source: BackendError,
    },
}

/// Submit an inference job against an already uploaded payload
pub async fn submit(state: &AppState, req: SubmitInference) -> Result<SubmittedJob, SubmissionError> {
    validate(&state.catalog, &req.endpoint_name, &req.parameters)?;

    let (payload_bucket, _) = object_key::parse_s3_uri(&req.payload_ref)
        .map_err(|e| SubmissionError::Validation(format!("payload_ref: {}", e)))?;
    let output_bucket = state
        .config
        .s3_bucket
        .clone()
        .unwrap_or_else(|| payload_bucket.to_string());

    launch(
        state,
        req.endpoint_name,
        req.payload_ref,
        &output_bucket,
        req.parameters,
    )
    .await
}

/// Submit an inference job whose payload is a configuration blob uploaded
/// through a presigned URL
pub async fn run_from_config(
    state: &AppState,
    req: RunInference,
) -> Result<SubmittedJob, SubmissionError> {
    validate(&state.catalog, &req.endpoint_name, &req.parameters)?;

    let bucket = state.config.s3_bucket.clone().ok_or_else(|| {
        SubmissionError::Unavailable("no S3 bucket is configured".to_string())
    })?;
    let name = req.config_name.as_deref().unwrap_or(DEFAULT_CONFIG_NAME);
    let payload_ref = object_key::config_uri(&bucket, name)
        .map_err(|e| SubmissionError::Validation(e.to_string()))?;

    launch(state, req.endpoint_name, payload_ref, &bucket, req.parameters).await
}

fn validate(
    catalog: &ModelCatalog,
    endpoint_name: &str,
    parameters: &InferenceParameters,
) -> Result<(), SubmissionError> {
    validate_endpoint_name(endpoint_name).map_err(SubmissionError::Validation)?;
    parameters.validate().map_err(SubmissionError::Validation)?;

    // an empty catalog means none was configured, so nothing to check against
    if catalog.is_empty() {
        return Ok(());
    }
    let requested = [
        (ModelKind::TextualInversion, &parameters.textual_inversions),
        (ModelKind::Lora, &parameters.loras),
        (ModelKind::Hypernetwork, &parameters.hypernetworks),
        (ModelKind::Controlnet, &parameters.controlnet_models),
    ];
    for (kind, names) in requested {
        let unknown = catalog.unknown(kind, names);
        if !unknown.is_empty() {
            return Err(SubmissionError::Validation(format!(
                "unknown {} models: {}",
                kind,
                unknown.join(", ")
            )));
        }
    }
    Ok(())
}

async fn launch(
    state: &AppState,
    endpoint_name: String,
    payload_ref: String,
    output_bucket: &str,
    parameters: InferenceParameters,
) -> Result<SubmittedJob, SubmissionError> {
    let job_id = Uuid::new_v4();
    let job = InferenceJob::new(
        job_id,
        endpoint_name,
        payload_ref,
        object_key::output_location(output_bucket, job_id),
        parameters,
    );

    state
        .inference_jobs
        .create(&job)
        .await
        .map_err(SubmissionError::Persistence)?;

    tracing::info!(
        "Inference job {} submitted to endpoint {}",
        job_id,
        job.endpoint_name
    );

    let invocation = AsyncInvocation {
        correlation_token: job_id,
        endpoint_name: job.endpoint_name.clone(),
        input_location: job.request_payload_ref.clone(),
        output_location: job.output_location.clone(),
        parameters: job.parameters.clone(),
    };

    let limit = state.config.invocation_timeout;
    if let Err(err) = backend::with_deadline(limit, state.backend.invoke_async(&invocation)).await
    {
        tracing::warn!("Invocation of job {} failed: {}", job_id, err);
        // same path an asynchronous failure signal takes
        let signal = CompletionSignal::failed(job_id, err.to_string());
        let failure_recorded = match completion::handle_inference_signal(state, signal).await {
            Ok(_) => true,
            Err(record_err) => {
                tracing::error!(
                    "Inference job {} left submitted, failure not recorded: {}",
                    job_id,
                    record_err
                );
                false
            }
        };
        return Err(SubmissionError::DownstreamInvocation {
            job_id,
            failure_recorded,
            source: err,
        });
    }

    match state
        .inference_jobs
        .update(job_id, JobStatus::Submitted, &|job: &mut InferenceJob| {
            job.mark_running()
        })
        .await
    {
        Ok(_) => tracing::info!("Inference job {} is running", job_id),
        Err(StoreError::Conflict { actual, .. }) => {
            tracing::debug!("Inference job {} already {} before start was recorded", job_id, actual)
        }
        Err(err) => tracing::warn!("Could not mark job {} running: {}", job_id, err),
    }

    Ok(SubmittedJob {
        job_id,
        status: JobStatus::Submitted,
    })
}
