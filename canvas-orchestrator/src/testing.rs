//! In-process fakes shared by the service and API tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use canvas_core::domain::catalog::ModelCatalog;
use canvas_core::domain::endpoint::EndpointDeploymentJob;
use canvas_core::domain::job::InferenceJob;
use canvas_core::domain::record::JobRecord;
use canvas_core::domain::status::JobStatus;
use canvas_core::dto::notification::JobNotification;
use uuid::Uuid;

use crate::backend::{AsyncInvocation, BackendError, EndpointProvisioning, InferenceBackend};
use crate::config::{Config, StoreBackend};
use crate::notify::{Notifier, NotifyError};
use crate::repository::{
    MemoryStore, Mutator, PageRequest, RecordStore, StoreError, StorePage,
};
use crate::state::AppState;
use crate::storage::{PresignError, Presigner};

pub const TEST_API_KEY: &str = "test-key";
pub const TEST_BUCKET: &str = "sd-bucket";

pub fn test_config() -> Config {
    Config {
        bind_addr: "127.0.0.1:0".to_string(),
        api_key: TEST_API_KEY.to_string(),
        store_backend: StoreBackend::Memory,
        database_url: String::new(),
        s3_bucket: Some(TEST_BUCKET.to_string()),
        presign_expiry: Duration::from_secs(900),
        inference_gateway_url: "http://gateway.test".to_string(),
        invocation_timeout: Duration::from_millis(50),
        notify_webhook_url: None,
        model_catalog_path: None,
    }
}

// =============================================================================
// Backend
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Accept,
    Reject,
    Hang,
}

pub struct RecordingBackend {
    behavior: Behavior,
    pub invocations: Mutex<Vec<AsyncInvocation>>,
    pub provisionings: Mutex<Vec<EndpointProvisioning>>,
    /// Status of the job record at the moment the invocation arrived
    pub observed: Mutex<Vec<Option<JobStatus>>>,
    watch: Mutex<Option<Arc<dyn RecordStore<InferenceJob>>>>,
}

impl RecordingBackend {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            invocations: Mutex::new(Vec::new()),
            provisionings: Mutex::new(Vec::new()),
            observed: Mutex::new(Vec::new()),
            watch: Mutex::new(None),
        }
    }

    pub fn watch(&self, store: Arc<dyn RecordStore<InferenceJob>>) {
        *self.watch.lock().unwrap() = Some(store);
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }

    async fn respond(&self) -> Result<(), BackendError> {
        match self.behavior {
            Behavior::Accept => Ok(()),
            Behavior::Reject => Err(BackendError::Rejected {
                status: 400,
                message: "Could not find endpoint".to_string(),
            }),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl InferenceBackend for RecordingBackend {
    async fn invoke_async(&self, invocation: &AsyncInvocation) -> Result<(), BackendError> {
        let watched = self.watch.lock().unwrap().clone();
        if let Some(store) = watched {
            let status = store
                .get(invocation.correlation_token)
                .await
                .ok()
                .map(|job| job.status());
            self.observed.lock().unwrap().push(status);
        }
        self.invocations.lock().unwrap().push(invocation.clone());
        self.respond().await
    }

    async fn start_endpoint_deployment(
        &self,
        request: &EndpointProvisioning,
    ) -> Result<(), BackendError> {
        self.provisionings.lock().unwrap().push(request.clone());
        self.respond().await
    }
}

// =============================================================================
// Notifier
// =============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    pub failing: bool,
    pub published: Mutex<Vec<JobNotification>>,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            failing: true,
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn published(&self) -> Vec<JobNotification> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, notification: &JobNotification) -> Result<(), NotifyError> {
        self.published.lock().unwrap().push(notification.clone());
        if self.failing {
            return Err(NotifyError::Rejected {
                status: 500,
                message: "subscriber down".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Presigner
// =============================================================================

pub struct FixedPresigner;

#[async_trait]
impl Presigner for FixedPresigner {
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, PresignError> {
        Ok(format!(
            "https://{}.s3.amazonaws.com/{}?X-Amz-Expires={}",
            bucket,
            key,
            expires_in.as_secs()
        ))
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, PresignError> {
        Ok(format!(
            "https://{}.s3.amazonaws.com/{}?x-id=GetObject&X-Amz-Expires={}",
            bucket,
            key,
            expires_in.as_secs()
        ))
    }
}

// =============================================================================
// Store
// =============================================================================

/// Store whose writes can be made to fail like an unreachable database
pub struct FailingStore<T> {
    inner: MemoryStore<T>,
    fail_create: bool,
    fail_update: bool,
}

impl<T> FailingStore<T> {
    pub fn on_create() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_create: true,
            fail_update: false,
        }
    }

    pub fn on_update() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_create: false,
            fail_update: true,
        }
    }

    pub fn inner(&self) -> &MemoryStore<T> {
        &self.inner
    }
}

fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl<T: JobRecord> RecordStore<T> for FailingStore<T> {
    async fn create(&self, record: &T) -> Result<(), StoreError> {
        if self.fail_create {
            return Err(unavailable());
        }
        self.inner.create(record).await
    }

    async fn get(&self, id: Uuid) -> Result<T, StoreError> {
        self.inner.get(id).await
    }

    async fn update(
        &self,
        id: Uuid,
        expected: JobStatus,
        mutator: Mutator<'_, T>,
    ) -> Result<T, StoreError> {
        if self.fail_update {
            return Err(unavailable());
        }
        self.inner.update(id, expected, mutator).await
    }

    async fn list(&self, page: &PageRequest) -> Result<StorePage<T>, StoreError> {
        self.inner.list(page).await
    }
}

// =============================================================================
// Harness
// =============================================================================

pub struct Harness {
    pub state: AppState,
    pub jobs: Arc<MemoryStore<InferenceJob>>,
    pub deployments: Arc<MemoryStore<EndpointDeploymentJob>>,
    pub backend: Arc<RecordingBackend>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(Behavior::Accept, RecordingNotifier::default(), ModelCatalog::default())
    }

    pub fn with_backend(behavior: Behavior) -> Self {
        Self::build(behavior, RecordingNotifier::default(), ModelCatalog::default())
    }

    pub fn with_notifier(notifier: RecordingNotifier) -> Self {
        Self::build(Behavior::Accept, notifier, ModelCatalog::default())
    }

    pub fn with_catalog(catalog: ModelCatalog) -> Self {
        Self::build(Behavior::Accept, RecordingNotifier::default(), catalog)
    }

    fn build(behavior: Behavior, notifier: RecordingNotifier, catalog: ModelCatalog) -> Self {
        let jobs = Arc::new(MemoryStore::new());
        let deployments = Arc::new(MemoryStore::new());
        let backend = Arc::new(RecordingBackend::new(behavior));
        let notifier = Arc::new(notifier);
        backend.watch(jobs.clone());

        let state = AppState {
            config: Arc::new(test_config()),
            inference_jobs: jobs.clone(),
            deployments: deployments.clone(),
            backend: backend.clone(),
            notifier: notifier.clone(),
            catalog: Arc::new(catalog),
            presigner: Some(Arc::new(FixedPresigner)),
        };

        Self {
            state,
            jobs,
            deployments,
            backend,
            notifier,
        }
    }
}
