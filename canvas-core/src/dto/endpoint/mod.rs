//! Endpoint deployment DTOs

use serde::{Deserialize, Serialize};

pub const DEFAULT_INSTANCE_COUNT: u32 = 1;
pub const MAX_INSTANCE_COUNT: u32 = 10;

/// Request to provision a named inference endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployEndpoint {
    pub endpoint_name: String,
    pub instance_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_instance_count: Option<u32>,
}
