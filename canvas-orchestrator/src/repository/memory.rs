//! In-memory job record store
//!
//! Used for local development (`STORE_BACKEND=memory`) and by the tests.
//! State is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use canvas_core::domain::record::JobRecord;
use canvas_core::domain::status::JobStatus;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Mutator, PageRequest, PageToken, RecordStore, StoreError, StorePage};

struct Inner<T> {
    records: HashMap<Uuid, T>,
    /// Insertion order, drives pagination
    order: Vec<Uuid>,
}

pub struct MemoryStore<T> {
    inner: RwLock<Inner<T>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: JobRecord> RecordStore<T> for MemoryStore<T> {
    async fn create(&self, record: &T) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let id = record.id();
        if inner.records.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        inner.records.insert(id, record.clone());
        inner.order.push(id);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<T, StoreError> {
        self.inner
            .read()
            .await
            .records
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(
        &self,
        id: Uuid,
        expected: JobStatus,
        mutator: Mutator<'_, T>,
    ) -> Result<T, StoreError> {
        let mut inner = self.inner.write().await;
        let current = inner.records.get(&id).ok_or(StoreError::NotFound(id))?;
        if current.status() != expected {
            return Err(StoreError::Conflict {
                id,
                expected,
                actual: current.status(),
            });
        }

        let mut updated = current.clone();
        mutator(&mut updated)?;
        inner.records.insert(id, updated.clone());
        Ok(updated)
    }

    async fn list(&self, page: &PageRequest) -> Result<StorePage<T>, StoreError> {
        let inner = self.inner.read().await;
        let start = match &page.token {
            Some(token) => usize::try_from(token.position()?)
                .map_err(|_| StoreError::InvalidPageToken(token.as_str().to_string()))?,
            None => 0,
        };
        if start > inner.order.len() {
            let token = page.token.as_ref().map(|t| t.as_str()).unwrap_or_default();
            return Err(StoreError::InvalidPageToken(token.to_string()));
        }

        let end = (start + page.limit as usize).min(inner.order.len());
        let items = inner.order[start..end]
            .iter()
            .filter_map(|id| inner.records.get(id).cloned())
            .collect();
        let next = (end < inner.order.len()).then(|| PageToken::from_position(end as u64));

        Ok(StorePage { items, next })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_core::domain::job::{InferenceJob, InferenceParameters};

    fn job() -> InferenceJob {
        InferenceJob::new(
            Uuid::new_v4(),
            "sd-endpoint".to_string(),
            "s3://bucket/in1.png".to_string(),
            "s3://bucket/out".to_string(),
            InferenceParameters {
                checkpoint: "model.ckpt".to_string(),
                sampler: "Euler a".to_string(),
                width: 512,
                height: 512,
                steps: None,
                cfg_scale: None,
                seed: None,
                textual_inversions: vec![],
                loras: vec![],
                hypernetworks: vec![],
                controlnet_models: vec![],
            },
        )
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let store: MemoryStore<InferenceJob> = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.get(id).await, Err(StoreError::NotFound(found)) if found == id));
    }

    #[tokio::test]
    async fn test_create_twice_is_rejected() {
        let store = MemoryStore::new();
        let job = job();
        store.create(&job).await.unwrap();
        assert!(matches!(
            store.create(&job).await,
            Err(StoreError::AlreadyExists(_))
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_is_compare_and_set() {
        let store = MemoryStore::new();
        let job = job();
        store.create(&job).await.unwrap();

        let updated = store
            .update(job.id, JobStatus::Submitted, &|j: &mut InferenceJob| {
                j.mark_succeeded("s3://bucket/out1.png".to_string())
            })
            .await
            .unwrap();
        assert_eq!(updated.status, JobStatus::Succeeded);

        // A stale writer still expecting `Submitted` must not regress the record.
        let stale = store
            .update(job.id, JobStatus::Submitted, &|j: &mut InferenceJob| {
                j.mark_running()
            })
            .await;
        assert!(matches!(
            stale,
            Err(StoreError::Conflict {
                actual: JobStatus::Succeeded,
                ..
            })
        ));
        assert_eq!(store.get(job.id).await.unwrap().status, JobStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_update_rejects_illegal_transition_without_writing() {
        let store = MemoryStore::new();
        let job = job();
        store.create(&job).await.unwrap();
        store
            .update(job.id, JobStatus::Submitted, &|j: &mut InferenceJob| {
                j.mark_failed("boom".to_string())
            })
            .await
            .unwrap();

        let result = store
            .update(job.id, JobStatus::Failed, &|j: &mut InferenceJob| {
                j.mark_succeeded("s3://late".to_string())
            })
            .await;
        assert!(matches!(result, Err(StoreError::InvalidTransition(_))));

        let stored = store.get(job.id).await.unwrap();
        assert_eq!(stored.status, JobStatus::Failed);
        assert!(stored.result_payload_ref.is_none());
    }

    #[tokio::test]
    async fn test_list_pages_in_insertion_order() {
        let store = MemoryStore::new();
        let jobs: Vec<_> = (0..5).map(|_| job()).collect();
        for job in &jobs {
            store.create(job).await.unwrap();
        }

        let first = store.list(&PageRequest::first(2)).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.items[0].id, jobs[0].id);

        let second = store
            .list(&PageRequest {
                token: first.next.clone(),
                limit: 2,
            })
            .await
            .unwrap();
        assert_eq!(second.items[0].id, jobs[2].id);

        let third = store
            .list(&PageRequest {
                token: second.next.clone(),
                limit: 2,
            })
            .await
            .unwrap();
        assert_eq!(third.items.len(), 1);
        assert_eq!(third.items[0].id, jobs[4].id);
        assert!(third.next.is_none());
    }

    #[tokio::test]
    async fn test_list_rejects_garbage_token() {
        let store: MemoryStore<InferenceJob> = MemoryStore::new();
        let result = store
            .list(&PageRequest::new(Some("zz".to_string()), None))
            .await;
        assert!(matches!(result, Err(StoreError::InvalidPageToken(_))));
    }
}
