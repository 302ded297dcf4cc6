//! Shared application state
//!
//! Built once in `main` and cloned into every handler. Components never read
//! the environment themselves; they get their collaborators from here.

use std::sync::Arc;

use canvas_core::domain::catalog::ModelCatalog;
use canvas_core::domain::endpoint::EndpointDeploymentJob;
use canvas_core::domain::job::InferenceJob;

use crate::backend::InferenceBackend;
use crate::config::Config;
use crate::notify::Notifier;
use crate::repository::RecordStore;
use crate::storage::Presigner;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub inference_jobs: Arc<dyn RecordStore<InferenceJob>>,
    pub deployments: Arc<dyn RecordStore<EndpointDeploymentJob>>,
    pub backend: Arc<dyn InferenceBackend>,
    pub notifier: Arc<dyn Notifier>,
    pub catalog: Arc<ModelCatalog>,
    /// Absent when no bucket is configured
    pub presigner: Option<Arc<dyn Presigner>>,
}
