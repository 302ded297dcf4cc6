//! Inference Job Repository
//!
//! Postgres-backed job record store. This file holds the store handle and the
//! inference job table; endpoint deployment jobs live in `endpoint.rs`.

use async_trait::async_trait;
use canvas_core::domain::job::{InferenceJob, InferenceParameters};
use canvas_core::domain::status::JobStatus;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Mutator, PageRequest, PageToken, RecordStore, StoreError, StorePage};

/// Postgres job record store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(super) fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore<InferenceJob> for PgStore {
    async fn create(&self, job: &InferenceJob) -> Result<(), StoreError> {
        let parameters = serde_json::to_value(&job.parameters)
            .map_err(|e| StoreError::Corrupt(format!("unserializable parameters: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO inference_jobs (id, status, endpoint_name, request_payload_ref,
                                        output_location, parameters, result_payload_ref,
                                        error_info, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(job.id)
        .bind(job.status.as_str())
        .bind(&job.endpoint_name)
        .bind(&job.request_payload_ref)
        .bind(&job.output_location)
        .bind(parameters)
        .bind(&job.result_payload_ref)
        .bind(&job.error_info)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, job.id))?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<InferenceJob, StoreError> {
        let row = sqlx::query_as::<_, InferenceJobRow>(
            r#"
            SELECT seq, id, status, endpoint_name, request_payload_ref, output_location,
                   parameters, result_payload_ref, error_info, created_at, updated_at
            FROM inference_jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(StoreError::NotFound(id))?.try_into()
    }

    async fn update(
        &self,
        id: Uuid,
        expected: JobStatus,
        mutator: Mutator<'_, InferenceJob>,
    ) -> Result<InferenceJob, StoreError> {
        let current = RecordStore::<InferenceJob>::get(self, id).await?;
        if current.status != expected {
            return Err(StoreError::Conflict {
                id,
                expected,
                actual: current.status,
            });
        }

        let mut updated = current;
        mutator(&mut updated)?;

        // The status guard in WHERE is the compare-and-set.
        let result = sqlx::query(
            r#"
            UPDATE inference_jobs
            SET status = $1, result_payload_ref = $2, error_info = $3, updated_at = $4
            WHERE id = $5 AND status = $6
            "#,
        )
        .bind(updated.status.as_str())
        .bind(&updated.result_payload_ref)
        .bind(&updated.error_info)
        .bind(updated.updated_at)
        .bind(id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let actual = RecordStore::<InferenceJob>::get(self, id).await?.status;
            return Err(StoreError::Conflict {
                id,
                expected,
                actual,
            });
        }

        Ok(updated)
    }

    async fn list(&self, page: &PageRequest) -> Result<StorePage<InferenceJob>, StoreError> {
        let after = match &page.token {
            Some(token) => position_to_seq(token)?,
            None => 0,
        };

        let rows = sqlx::query_as::<_, InferenceJobRow>(
            r#"
            SELECT seq, id, status, endpoint_name, request_payload_ref, output_location,
                   parameters, result_payload_ref, error_info, created_at, updated_at
            FROM inference_jobs
            WHERE seq > $1
            ORDER BY seq ASC
            LIMIT $2
            "#,
        )
        .bind(after)
        .bind(i64::from(page.limit) + 1)
        .fetch_all(&self.pool)
        .await?;

        paginate(rows, page.limit, |row| row.seq)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

pub(super) fn map_insert_error(err: sqlx::Error, id: Uuid) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::AlreadyExists(id),
        _ => StoreError::Database(err),
    }
}

pub(super) fn position_to_seq(token: &PageToken) -> Result<i64, StoreError> {
    i64::try_from(token.position()?)
        .map_err(|_| StoreError::InvalidPageToken(token.as_str().to_string()))
}

/// Rows were fetched with `limit + 1`; the extra row only signals another page.
pub(super) fn paginate<R, T>(
    mut rows: Vec<R>,
    limit: u32,
    seq: impl Fn(&R) -> i64,
) -> Result<StorePage<T>, StoreError>
where
    R: TryInto<T, Error = StoreError>,
{
    let has_more = rows.len() > limit as usize;
    rows.truncate(limit as usize);

    let next = match (has_more, rows.last()) {
        (true, Some(last)) => Some(PageToken::from_position(seq(last) as u64)),
        _ => None,
    };

    let items = rows
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<T>, StoreError>>()?;

    Ok(StorePage { items, next })
}

pub(super) fn parse_status(s: &str) -> Result<JobStatus, StoreError> {
    s.parse().map_err(StoreError::Corrupt)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct InferenceJobRow {
    seq: i64,
    id: Uuid,
    status: String,
    endpoint_name: String,
    request_payload_ref: String,
    output_location: String,
    parameters: serde_json::Value,
    result_payload_ref: Option<String>,
    error_info: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<InferenceJobRow> for InferenceJob {
    type Error = StoreError;

    fn try_from(row: InferenceJobRow) -> Result<Self, Self::Error> {
        let parameters: InferenceParameters = serde_json::from_value(row.parameters)
            .map_err(|e| StoreError::Corrupt(format!("job {} parameters: {}", row.id, e)))?;

        Ok(InferenceJob {
            id: row.id,
            status: parse_status(&row.status)?,
            endpoint_name: row.endpoint_name,
            request_payload_ref: row.request_payload_ref,
            output_location: row.output_location,
            parameters,
            result_payload_ref: row.result_payload_ref,
            error_info: row.error_info,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
