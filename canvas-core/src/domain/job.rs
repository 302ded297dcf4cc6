//! Inference job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::record::{InvalidTransition, JobRecord};
use crate::domain::status::JobStatus;

/// One asynchronous inference request tracked from submission to completion
///
/// The input payload never travels inline: `request_payload_ref` points at the
/// object the client uploaded beforehand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceJob {
    pub id: Uuid,
    pub status: JobStatus,
    pub endpoint_name: String,
    pub request_payload_ref: String,
    /// Where the backend is told to write its output
    pub output_location: String,
    pub parameters: InferenceParameters,
    pub result_payload_ref: Option<String>,
    pub error_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InferenceJob {
    /// A fresh record in `Submitted` state
    pub fn new(
        id: Uuid,
        endpoint_name: String,
        request_payload_ref: String,
        output_location: String,
        parameters: InferenceParameters,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Submitted,
            endpoint_name,
            request_payload_ref,
            output_location,
            parameters,
            result_payload_ref: None,
            error_info: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_running(&mut self) -> Result<(), InvalidTransition> {
        self.transition(JobStatus::Running)
    }

    pub fn mark_succeeded(&mut self, result_ref: String) -> Result<(), InvalidTransition> {
        self.transition(JobStatus::Succeeded)?;
        self.result_payload_ref = Some(result_ref);
        Ok(())
    }

    pub fn mark_failed(&mut self, error_info: String) -> Result<(), InvalidTransition> {
        self.transition(JobStatus::Failed)?;
        self.error_info = Some(error_info);
        Ok(())
    }
}

impl JobRecord for InferenceJob {
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

/// Generation parameters forwarded to the inference endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceParameters {
    pub checkpoint: String,
    pub sampler: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default)]
    pub textual_inversions: Vec<String>,
    #[serde(default)]
    pub loras: Vec<String>,
    #[serde(default)]
    pub hypernetworks: Vec<String>,
    #[serde(default)]
    pub controlnet_models: Vec<String>,
}

pub const MIN_DIMENSION: u32 = 64;
pub const MAX_DIMENSION: u32 = 2048;
pub const MAX_STEPS: u32 = 150;

impl InferenceParameters {
    /// Check every field, returning the first problem found
    pub fn validate(&self) -> Result<(), String> {
        if self.checkpoint.trim().is_empty() {
            return Err("checkpoint is required".to_string());
        }
        if self.sampler.trim().is_empty() {
            return Err("sampler is required".to_string());
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
                return Err(format!(
                    "{} must be between {} and {} (got {})",
                    name, MIN_DIMENSION, MAX_DIMENSION, value
                ));
            }
            if value % 8 != 0 {
                return Err(format!("{} must be a multiple of 8 (got {})", name, value));
            }
        }
        if let Some(steps) = self.steps {
            if steps == 0 || steps > MAX_STEPS {
                return Err(format!("steps must be between 1 and {}", MAX_STEPS));
            }
        }
        if let Some(cfg_scale) = self.cfg_scale {
            if !cfg_scale.is_finite() || cfg_scale <= 0.0 {
                return Err("cfg_scale must be a positive number".to_string());
            }
        }
        let add_ons = [
            ("textual_inversions", &self.textual_inversions),
            ("loras", &self.loras),
            ("hypernetworks", &self.hypernetworks),
            ("controlnet_models", &self.controlnet_models),
        ];
        for (name, models) in add_ons {
            if models.iter().any(|m| m.trim().is_empty()) {
                return Err(format!("{} contains an empty model name", name));
            }
        }
        Ok(())
    }
}
