//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::service::deployment_service::DeploymentError;
use crate::service::output_service::OutputError;
use crate::service::query_service::QueryError;
use crate::service::submission_service::SubmissionError;
use crate::service::upload_service::UploadError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Forbidden,
    /// The job exists but is not in a state that allows the request
    Conflict(String),
    /// A dependency is missing or unreachable; the caller may retry
    Unavailable(String),
    /// The job was recorded but the downstream call was not accepted
    BadGateway {
        job_id: Uuid,
        failure_recorded: bool,
        message: String,
    },
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg })),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                serde_json::json!({ "error": "Forbidden" }),
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, serde_json::json!({ "error": msg })),
            ApiError::Unavailable(msg) => {
                tracing::error!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    serde_json::json!({ "error": msg }),
                )
            }
            ApiError::BadGateway {
                job_id,
                failure_recorded,
                message,
            } => (
                StatusCode::BAD_GATEWAY,
                serde_json::json!({
                    "error": message,
                    "job_id": job_id,
                    "failure_recorded": failure_recorded,
                }),
            ),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(msg) => ApiError::BadRequest(msg),
            SubmissionError::Unavailable(msg) => ApiError::Unavailable(msg),
            SubmissionError::Persistence(err) => ApiError::Unavailable(err.to_string()),
            err @ SubmissionError::DownstreamInvocation {
                job_id,
                failure_recorded,
                ..
            } => ApiError::BadGateway {
                job_id,
                failure_recorded,
                message: err.to_string(),
            },
        }
    }
}

impl From<DeploymentError> for ApiError {
    fn from(err: DeploymentError) -> Self {
        match err {
            DeploymentError::Validation(msg) => ApiError::BadRequest(msg),
            DeploymentError::Persistence(err) => ApiError::Unavailable(err.to_string()),
            err @ DeploymentError::Provisioning {
                job_id,
                failure_recorded,
                ..
            } => ApiError::BadGateway {
                job_id,
                failure_recorded,
                message: err.to_string(),
            },
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::NotFound(id) => ApiError::NotFound(format!("Job {} not found", id)),
            QueryError::InvalidPageToken(_) => ApiError::BadRequest(err.to_string()),
            QueryError::Store(err) => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<OutputError> for ApiError {
    fn from(err: OutputError) -> Self {
        match err {
            OutputError::NotFound(id) => ApiError::NotFound(format!("Job {} not found", id)),
            OutputError::NotSucceeded { .. } => ApiError::Conflict(err.to_string()),
            OutputError::Unavailable => ApiError::Unavailable(err.to_string()),
            OutputError::InvalidReference { .. } | OutputError::Presign(_) => {
                ApiError::InternalError(err.to_string())
            }
            OutputError::Store(err) => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Unavailable => ApiError::Unavailable(err.to_string()),
            UploadError::InvalidName(_) => ApiError::BadRequest(err.to_string()),
            UploadError::Presign(_) => ApiError::InternalError(err.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
