//! Inference API Handlers
//!
//! Submission and query endpoints for inference jobs.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use canvas_core::domain::job::InferenceJob;
use canvas_core::dto::job::{
    InferenceOutput, JobLookup, RunInference, SubmitInference, SubmittedJob,
};
use canvas_core::dto::page::{ListQuery, Page};

use crate::api::error::ApiResult;
use crate::service::{output_service, query_service, submission_service};
use crate::state::AppState;

// =============================================================================
// Submission Endpoints
// =============================================================================

/// POST /inference
/// Submit an inference job against an uploaded payload
pub async fn submit_inference(
    State(state): State<AppState>,
    payload: Result<Json<SubmitInference>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SubmittedJob>)> {
    let Json(req) = payload?;
    tracing::debug!("Submitting inference to endpoint: {}", req.endpoint_name);

    let job = submission_service::submit(&state, req).await?;
    Ok((StatusCode::ACCEPTED, Json(job)))
}

/// POST /inference/run-sagemaker-inference
/// Submit an inference job whose payload is an uploaded configuration blob
pub async fn run_sagemaker_inference(
    State(state): State<AppState>,
    payload: Result<Json<RunInference>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SubmittedJob>)> {
    let Json(req) = payload?;
    tracing::debug!(
        "Running inference from config {:?} on endpoint: {}",
        req.config_name,
        req.endpoint_name
    );

    let job = submission_service::run_from_config(&state, req).await?;
    Ok((StatusCode::ACCEPTED, Json(job)))
}

// =============================================================================
// Query Endpoints
// =============================================================================

/// GET /inference/list-inference-jobs?page_token=&limit=
pub async fn list_inference_jobs(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Page<InferenceJob>>> {
    let Query(query) = query?;
    let page = query_service::list_inference_jobs(&state, &query).await?;
    Ok(Json(page))
}

/// GET /inference/get-inference-job?job_id=
pub async fn get_inference_job(
    State(state): State<AppState>,
    query: Result<Query<JobLookup>, QueryRejection>,
) -> ApiResult<Json<InferenceJob>> {
    let Query(lookup) = query?;
    tracing::debug!("Getting inference job: {}", lookup.job_id);

    let job = query_service::get_inference_job(&state, lookup.job_id).await?;
    Ok(Json(job))
}

/// GET /inference/get-inference-job-image-output?job_id=
/// Download link for a succeeded job's result
pub async fn get_inference_job_output(
    State(state): State<AppState>,
    query: Result<Query<JobLookup>, QueryRejection>,
) -> ApiResult<Json<InferenceOutput>> {
    let Query(lookup) = query?;
    let output = output_service::inference_job_output(&state, lookup.job_id).await?;
    Ok(Json(output))
}
