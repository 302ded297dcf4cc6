//! Endpoint deployment job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::record::{InvalidTransition, JobRecord};
use crate::domain::status::JobStatus;

/// Provisioning of a named inference endpoint
///
/// Inference jobs reference endpoints by name; an endpoint may still be
/// mid-deployment when jobs are submitted against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDeploymentJob {
    pub id: Uuid,
    pub status: JobStatus,
    pub endpoint_name: String,
    pub instance_type: String,
    pub initial_instance_count: u32,
    pub error_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EndpointDeploymentJob {
    pub fn new(
        id: Uuid,
        endpoint_name: String,
        instance_type: String,
        initial_instance_count: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Submitted,
            endpoint_name,
            instance_type,
            initial_instance_count,
            error_info: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_running(&mut self) -> Result<(), InvalidTransition> {
        self.transition(JobStatus::Running)
    }

    pub fn mark_succeeded(&mut self) -> Result<(), InvalidTransition> {
        self.transition(JobStatus::Succeeded)
    }

    pub fn mark_failed(&mut self, error_info: String) -> Result<(), InvalidTransition> {
        self.transition(JobStatus::Failed)?;
        self.error_info = Some(error_info);
        Ok(())
    }
}

impl JobRecord for EndpointDeploymentJob {
    fn id(&self) -> Uuid {
        self.id
    }

    fn status(&self) -> JobStatus {
        self.status
    }

    fn set_status(&mut self, status: JobStatus) {
        self.status = status;
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// Endpoint names follow the managed-endpoint naming rule: 1-63 chars of
/// ASCII alphanumerics and hyphens, not starting or ending with a hyphen.
pub fn validate_endpoint_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > 63 {
        return Err("endpoint_name must be 1-63 characters".to_string());
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(format!(
            "endpoint_name '{}' may only contain letters, digits and hyphens",
            name
        ));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(format!(
            "endpoint_name '{}' must not start or end with a hyphen",
            name
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_deployment_records_error() {
        let mut job = EndpointDeploymentJob::new(
            Uuid::new_v4(),
            "sd-endpoint".to_string(),
            "ml.g4dn.xlarge".to_string(),
            1,
        );
        job.mark_running().unwrap();
        job.mark_failed("capacity error".to_string()).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_info.as_deref(), Some("capacity error"));
        assert!(job.mark_succeeded().is_err());
    }

    #[test]
    fn test_endpoint_name_rules() {
        assert!(validate_endpoint_name("sd-endpoint-1").is_ok());
        assert!(validate_endpoint_name("").is_err());
        assert!(validate_endpoint_name("-leading").is_err());
        assert!(validate_endpoint_name("trailing-").is_err());
        assert!(validate_endpoint_name("under_score").is_err());
        assert!(validate_endpoint_name(&"a".repeat(64)).is_err());
    }
}
