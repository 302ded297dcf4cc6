//! Inference Output Service
//!
//! Hands out time-limited download URLs for the result object of a
//! succeeded inference job. Reads the record, never writes it.

use canvas_core::domain::object_key::{self, ObjectKeyError};
use canvas_core::domain::status::JobStatus;
use canvas_core::dto::job::InferenceOutput;
use thiserror::Error;
use uuid::Uuid;

use crate::repository::{RecordStore, StoreError};
use crate::state::AppState;
use crate::storage::PresignError;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("job {0} not found")]
    NotFound(Uuid),

    #[error("job {id} has no output: it is {status}")]
    NotSucceeded { id: Uuid, status: JobStatus },

    #[error("result downloads are unavailable: no object store is configured")]
    Unavailable,

    #[error("job {id} has an unusable result reference: {source}")]
    InvalidReference {
        id: Uuid,
        #[source]
        source: ObjectKeyError,
    },

    #[error(transparent)]
    Presign(#[from] PresignError),

    #[error(transparent)]
    Store(StoreError),
}

/// Download URL for the result of a succeeded inference job
pub async fn inference_job_output(
    state: &AppState,
    id: Uuid,
) -> Result<InferenceOutput, OutputError> {
    let job = state.inference_jobs.get(id).await.map_err(|err| match err {
        StoreError::NotFound(id) => OutputError::NotFound(id),
        other => OutputError::Store(other),
    })?;

    if job.status != JobStatus::Succeeded {
        return Err(OutputError::NotSucceeded {
            id,
            status: job.status,
        });
    }
    let Some(presigner) = &state.presigner else {
        return Err(OutputError::Unavailable);
    };

    let result_ref = job.result_payload_ref.unwrap_or(job.output_location);
    let (bucket, key) = object_key::parse_s3_uri(&result_ref)
        .map_err(|source| OutputError::InvalidReference { id, source })?;
    let expires_in = state.config.presign_expiry;
    let download_url = presigner.presign_get(bucket, key, expires_in).await?;

    tracing::debug!("Presigned download of {} for job {}", result_ref, id);

    Ok(InferenceOutput {
        job_id: id,
        result_ref,
        download_url,
        expires_in_secs: expires_in.as_secs(),
    })
}
