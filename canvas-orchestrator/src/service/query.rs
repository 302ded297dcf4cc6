//! Status Query Service
//!
//! Read-only access to job records. Never writes.

use canvas_core::domain::endpoint::EndpointDeploymentJob;
use canvas_core::domain::job::InferenceJob;
use canvas_core::domain::record::JobRecord;
use canvas_core::dto::page::{ListQuery, Page};
use thiserror::Error;
use uuid::Uuid;

use crate::repository::{PageRequest, RecordStore, StoreError};
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("job {0} not found")]
    NotFound(Uuid),

    #[error("invalid page token '{0}'")]
    InvalidPageToken(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => QueryError::NotFound(id),
            StoreError::InvalidPageToken(token) => QueryError::InvalidPageToken(token),
            other => QueryError::Store(other),
        }
    }
}

pub async fn get_inference_job(state: &AppState, id: Uuid) -> Result<InferenceJob, QueryError> {
    get(state.inference_jobs.as_ref(), id).await
}

pub async fn list_inference_jobs(
    state: &AppState,
    query: &ListQuery,
) -> Result<Page<InferenceJob>, QueryError> {
    list(state.inference_jobs.as_ref(), query).await
}

pub async fn get_endpoint_deployment_job(
    state: &AppState,
    id: Uuid,
) -> Result<EndpointDeploymentJob, QueryError> {
    get(state.deployments.as_ref(), id).await
}

pub async fn list_endpoint_deployment_jobs(
    state: &AppState,
    query: &ListQuery,
) -> Result<Page<EndpointDeploymentJob>, QueryError> {
    list(state.deployments.as_ref(), query).await
}

async fn get<T: JobRecord>(store: &dyn RecordStore<T>, id: Uuid) -> Result<T, QueryError> {
    Ok(store.get(id).await?)
}

async fn list<T: JobRecord>(
    store: &dyn RecordStore<T>,
    query: &ListQuery,
) -> Result<Page<T>, QueryError> {
    let request = PageRequest::new(query.page_token.clone(), query.limit);
    let page = store.list(&request).await?;

    Ok(Page {
        items: page.items,
        next_page_token: page.next.map(|token| token.as_str().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_core::domain::job::InferenceParameters;

    use crate::testing::Harness;

    fn job() -> InferenceJob {
        let id = Uuid::new_v4();
        InferenceJob::new(
            id,
            "sd-endpoint".to_string(),
            "s3://bucket/in.png".to_string(),
            format!("s3://bucket/out/{}/result", id),
            InferenceParameters {
                checkpoint: "sd_xl_base_1.0.safetensors".to_string(),
                sampler: "DPM++ 2M Karras".to_string(),
                width: 1024,
                height: 1024,
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
    async fn test_unknown_job_is_not_found() {
        let harness = Harness::new();
        let id = Uuid::new_v4();

        let err = get_inference_job(&harness.state, id).await.unwrap_err();
        assert!(matches!(err, QueryError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_list_pages_in_insertion_order() {
        let harness = Harness::new();
        let mut ids = Vec::new();
        for _ in 0..5 {
            let job = job();
            ids.push(job.id);
            harness.jobs.create(&job).await.unwrap();
        }

        let first = list_inference_jobs(
            &harness.state,
            &ListQuery {
                page_token: None,
                limit: Some(3),
            },
        )
        .await
        .unwrap();
        assert_eq!(first.items.iter().map(|j| j.id).collect::<Vec<_>>(), ids[..3]);
        let token = first.next_page_token.expect("more pages");

        let second = list_inference_jobs(
            &harness.state,
            &ListQuery {
                page_token: Some(token),
                limit: Some(3),
            },
        )
        .await
        .unwrap();
        assert_eq!(second.items.iter().map(|j| j.id).collect::<Vec<_>>(), ids[3..]);
        assert!(second.next_page_token.is_none());
    }

    #[tokio::test]
    async fn test_garbage_page_token() {
        let harness = Harness::new();
        let query = ListQuery {
            page_token: Some("not-a-token".to_string()),
            limit: None,
        };

        let err = list_inference_jobs(&harness.state, &query).await.unwrap_err();
        assert!(matches!(err, QueryError::InvalidPageToken(_)));
    }

    #[tokio::test]
    async fn test_empty_deployment_listing() {
        let harness = Harness::new();
        let page = list_endpoint_deployment_jobs(&harness.state, &ListQuery::default())
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
