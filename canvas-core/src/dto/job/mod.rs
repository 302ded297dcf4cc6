//! Inference job DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::job::InferenceParameters;
use crate::domain::status::JobStatus;

/// Request to submit an inference job against an already uploaded payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitInference {
    pub endpoint_name: String,
    /// Object-store reference of the input payload, e.g. `s3://bucket/in1.png`
    pub payload_ref: String,
    pub parameters: InferenceParameters,
}

/// Request to run inference from a configuration blob previously uploaded
/// through a presigned URL (`config/<name>.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInference {
    pub endpoint_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_name: Option<String>,
    pub parameters: InferenceParameters,
}

/// Response to a successful submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedJob {
    pub job_id: Uuid,
    pub status: JobStatus,
}

/// Query string for single-job lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobLookup {
    pub job_id: Uuid,
}

/// Time-limited download link for a succeeded job's result object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceOutput {
    pub job_id: Uuid,
    /// Object-store reference recorded when the job succeeded
    pub result_ref: String,
    pub download_url: String,
    pub expires_in_secs: u64,
}
