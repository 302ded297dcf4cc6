//! Presigned upload DTOs

use serde::{Deserialize, Serialize};

/// Query string for presigned upload requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Configuration name; the object lands at `config/<name>.json`
    pub name: String,
}

/// Time-limited URL the client uses to PUT its payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresignedUpload {
    pub key: String,
    pub url: String,
    pub expires_in_secs: u64,
}
