//! Liveness check. Reachable without an API key.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{config::StoreBackend, state::AppState};

/// GET /health
///
/// Reports which record store is active and whether presigned uploads are
/// available, so a misconfigured deployment shows up before the first job.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let store = match state.config.store_backend {
        StoreBackend::Postgres => "postgres",
        StoreBackend::Memory => "memory",
    };
    Json(json!({
        "status": "ok",
        "store": store,
        "uploads": state.presigner.is_some(),
    }))
}
