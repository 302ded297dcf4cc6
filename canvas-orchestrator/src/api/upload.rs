//! Presigned Upload API Handler

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use canvas_core::dto::upload::{PresignedUpload, UploadRequest};

use crate::api::error::ApiResult;
use crate::service::upload_service;
use crate::state::AppState;

/// GET /inference/generate-s3-presigned-url-for-uploading?name=
pub async fn presigned_upload_url(
    State(state): State<AppState>,
    query: Result<Query<UploadRequest>, QueryRejection>,
) -> ApiResult<Json<PresignedUpload>> {
    let Query(req) = query?;
    let upload = upload_service::presign_config_upload(&state, &req.name).await?;
    Ok(Json(upload))
}
