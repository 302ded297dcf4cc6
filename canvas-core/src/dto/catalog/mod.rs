//! Model catalog DTOs

use serde::{Deserialize, Serialize};

use crate::domain::catalog::ModelKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    pub kind: ModelKind,
    pub models: Vec<String>,
}
