use std::sync::Arc;

use anyhow::Context;
use canvas_core::domain::endpoint::EndpointDeploymentJob;
use canvas_core::domain::job::InferenceJob;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod backend;
pub mod config;
pub mod db;
pub mod notify;
pub mod repository;
pub mod service;
pub mod state;
pub mod storage;

#[cfg(test)]
mod testing;

use crate::backend::HttpInferenceBackend;
use crate::config::{Config, StoreBackend};
use crate::notify::{LogNotifier, Notifier, WebhookNotifier};
use crate::repository::{MemoryStore, PgStore, RecordStore};
use crate::state::AppState;
use crate::storage::{Presigner, S3Presigner};

type Stores = (
    Arc<dyn RecordStore<InferenceJob>>,
    Arc<dyn RecordStore<EndpointDeploymentJob>>,
);

async fn open_stores(config: &Config) -> anyhow::Result<Stores> {
    match config.store_backend {
        StoreBackend::Postgres => {
            tracing::info!("Connecting to database...");

            let pool = db::create_pool(&config.database_url)
                .await
                .context("Failed to create database pool")?;

            tracing::info!("Database connection pool created");

            db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;

            let store = PgStore::new(pool);
            let inference_jobs: Arc<dyn RecordStore<InferenceJob>> = Arc::new(store.clone());
            let deployments: Arc<dyn RecordStore<EndpointDeploymentJob>> = Arc::new(store);
            Ok((inference_jobs, deployments))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory job store, records are lost on restart");
            let inference_jobs: Arc<dyn RecordStore<InferenceJob>> = Arc::new(MemoryStore::new());
            let deployments: Arc<dyn RecordStore<EndpointDeploymentJob>> =
                Arc::new(MemoryStore::new());
            Ok((inference_jobs, deployments))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canvas_orchestrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Canvas Orchestrator...");

    let config = Config::from_env().context("Invalid configuration")?;

    let (inference_jobs, deployments) = open_stores(&config).await?;

    let catalog = service::catalog_service::load_catalog(config.model_catalog_path.as_deref())
        .context("Failed to load model catalog")?;

    let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
        Some(url) => {
            tracing::info!("Publishing job notifications to {}", url);
            Arc::new(WebhookNotifier::new(url.clone()))
        }
        None => {
            tracing::info!("No NOTIFY_WEBHOOK_URL set, job notifications are only logged");
            Arc::new(LogNotifier)
        }
    };

    let presigner: Option<Arc<dyn Presigner>> = match &config.s3_bucket {
        Some(bucket) => {
            tracing::info!("Presigned uploads enabled for bucket {}", bucket);
            Some(Arc::new(S3Presigner::from_env().await))
        }
        None => None,
    };

    let backend = Arc::new(HttpInferenceBackend::new(config.inference_gateway_url.clone()));

    let addr = config.bind_addr.clone();
    let state = AppState {
        config: Arc::new(config),
        inference_jobs,
        deployments,
        backend,
        notifier,
        catalog: Arc::new(catalog),
        presigner,
    };

    // Build router with all API endpoints
    let app = api::create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
