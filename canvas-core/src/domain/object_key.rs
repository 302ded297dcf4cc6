//! Object-store key conventions
//!
//! Payloads are exchanged by reference. Configuration blobs uploaded through
//! presigned URLs live under `config/`, inference output under
//! `out/<job_id>/result`.

use thiserror::Error;
use uuid::Uuid;

pub const CONFIG_PREFIX: &str = "config/";
pub const DEFAULT_CONFIG_NAME: &str = "aigc";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectKeyError {
    #[error("invalid object name '{0}': use letters, digits, '-' or '_'")]
    InvalidName(String),

    #[error("invalid s3 uri '{0}'")]
    InvalidUri(String),
}

fn validate_name(name: &str) -> Result<(), ObjectKeyError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ObjectKeyError::InvalidName(name.to_string()))
    }
}

/// Key of a configuration blob, e.g. `config/aigc.json`
pub fn config_key(name: &str) -> Result<String, ObjectKeyError> {
    validate_name(name)?;
    Ok(format!("{}{}.json", CONFIG_PREFIX, name))
}

/// Full reference to a configuration blob in `bucket`
pub fn config_uri(bucket: &str, name: &str) -> Result<String, ObjectKeyError> {
    Ok(format!("s3://{}/{}", bucket, config_key(name)?))
}

/// Output destination handed to the inference backend for `job_id`
pub fn output_location(bucket: &str, job_id: Uuid) -> String {
    format!("s3://{}/out/{}/result", bucket, job_id)
}

/// Split `s3://bucket/key` into `(bucket, key)`
pub fn parse_s3_uri(uri: &str) -> Result<(&str, &str), ObjectKeyError> {
    let rest = uri
        .strip_prefix("s3://")
        .ok_or_else(|| ObjectKeyError::InvalidUri(uri.to_string()))?;
    match rest.split_once('/') {
        Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => Ok((bucket, key)),
        _ => Err(ObjectKeyError::InvalidUri(uri.to_string())),
    }
}
