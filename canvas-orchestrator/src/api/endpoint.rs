//! Endpoint Deployment API Handlers

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use canvas_core::domain::endpoint::EndpointDeploymentJob;
use canvas_core::dto::endpoint::DeployEndpoint;
use canvas_core::dto::job::{JobLookup, SubmittedJob};
use canvas_core::dto::page::{ListQuery, Page};

use crate::api::error::ApiResult;
use crate::service::{deployment_service, query_service};
use crate::state::AppState;

/// POST /inference/deploy-sagemaker-endpoint
pub async fn deploy_endpoint(
    State(state): State<AppState>,
    payload: Result<Json<DeployEndpoint>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SubmittedJob>)> {
    let Json(req) = payload?;
    tracing::debug!("Deploying endpoint: {}", req.endpoint_name);

    let job = deployment_service::deploy(&state, req).await?;
    Ok((StatusCode::ACCEPTED, Json(job)))
}

/// GET /inference/list-endpoint-deployment-jobs?page_token=&limit=
pub async fn list_endpoint_deployment_jobs(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Page<EndpointDeploymentJob>>> {
    let Query(query) = query?;
    let page = query_service::list_endpoint_deployment_jobs(&state, &query).await?;
    Ok(Json(page))
}

/// GET /inference/get-endpoint-deployment-job?job_id=
pub async fn get_endpoint_deployment_job(
    State(state): State<AppState>,
    query: Result<Query<JobLookup>, QueryRejection>,
) -> ApiResult<Json<EndpointDeploymentJob>> {
    let Query(lookup) = query?;
    let job = query_service::get_endpoint_deployment_job(&state, lookup.job_id).await?;
    Ok(Json(job))
}
