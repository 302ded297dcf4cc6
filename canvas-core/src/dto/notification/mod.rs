//! Outbound notification DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::status::JobStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Inference,
    EndpointDeployment,
}

/// Summary published to the user-facing channel when a job reaches a
/// terminal state. Subscribers must tolerate duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobNotification {
    pub job_id: Uuid,
    pub kind: JobKind,
    pub outcome: JobStatus,
    pub summary: String,
}

impl JobNotification {
    pub fn inference_succeeded(job_id: Uuid, result_ref: &str) -> Self {
        Self {
            job_id,
            kind: JobKind::Inference,
            outcome: JobStatus::Succeeded,
            summary: format!("Inference job {} succeeded, result at {}", job_id, result_ref),
        }
    }

    pub fn inference_failed(job_id: Uuid, error_info: &str) -> Self {
        Self {
            job_id,
            kind: JobKind::Inference,
            outcome: JobStatus::Failed,
            summary: format!("Inference job {} failed: {}", job_id, error_info),
        }
    }

    pub fn deployment_succeeded(job_id: Uuid, endpoint_name: &str) -> Self {
        Self {
            job_id,
            kind: JobKind::EndpointDeployment,
            outcome: JobStatus::Succeeded,
            summary: format!("Endpoint {} is in service (deployment {})", endpoint_name, job_id),
        }
    }

    pub fn deployment_failed(job_id: Uuid, endpoint_name: &str, error_info: &str) -> Self {
        Self {
            job_id,
            kind: JobKind::EndpointDeployment,
            outcome: JobStatus::Failed,
            summary: format!(
                "Endpoint {} deployment {} failed: {}",
                endpoint_name, job_id, error_info
            ),
        }
    }
}
