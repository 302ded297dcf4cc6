//! Model Catalog Service
//!
//! Add-on model lists are static configuration loaded once at startup.

use std::path::{Path, PathBuf};

use canvas_core::domain::catalog::{ModelCatalog, ModelKind};
use canvas_core::dto::catalog::ModelList;
use thiserror::Error;

use crate::state::AppState;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read model catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load the catalog from `path`, or an empty one when no path is configured
pub fn load_catalog(path: Option<&Path>) -> Result<ModelCatalog, CatalogError> {
    let Some(path) = path else {
        tracing::info!("No model catalog configured, add-on model lists are empty");
        return Ok(ModelCatalog::default());
    };

    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog: ModelCatalog =
        serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    for kind in ModelKind::ALL {
        tracing::debug!("Catalog lists {} {} models", catalog.models(kind).len(), kind);
    }

    Ok(catalog)
}

pub fn list_models(state: &AppState, kind: ModelKind) -> ModelList {
    ModelList {
        kind,
        models: state.catalog.models(kind).to_vec(),
    }
}
