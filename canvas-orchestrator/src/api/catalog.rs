//! Model Catalog API Handlers
//!
//! Read-only lists backed by static configuration.

use axum::{Json, extract::State};
use canvas_core::domain::catalog::ModelKind;
use canvas_core::dto::catalog::ModelList;

use crate::service::catalog_service;
use crate::state::AppState;

/// GET /inference/get-texual-inversion-list
pub async fn textual_inversion_list(State(state): State<AppState>) -> Json<ModelList> {
    Json(catalog_service::list_models(&state, ModelKind::TextualInversion))
}

/// GET /inference/get-lora-list
pub async fn lora_list(State(state): State<AppState>) -> Json<ModelList> {
    Json(catalog_service::list_models(&state, ModelKind::Lora))
}

/// GET /inference/get-hypernetwork-list
pub async fn hypernetwork_list(State(state): State<AppState>) -> Json<ModelList> {
    Json(catalog_service::list_models(&state, ModelKind::Hypernetwork))
}

/// GET /inference/get-controlnet-model-list
pub async fn controlnet_model_list(State(state): State<AppState>) -> Json<ModelList> {
    Json(catalog_service::list_models(&state, ModelKind::Controlnet))
}
