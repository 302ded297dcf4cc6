//! Endpoint Deployment Job Repository
//!
//! Handles all database operations related to endpoint deployment jobs.

use async_trait::async_trait;
use canvas_core::domain::endpoint::EndpointDeploymentJob;
use canvas_core::domain::status::JobStatus;
use uuid::Uuid;

use super::job::{map_insert_error, paginate, parse_status, position_to_seq};
use super::{Mutator, PageRequest, PgStore, RecordStore, StoreError, StorePage};

#[async_trait]
impl RecordStore<EndpointDeploymentJob> for PgStore {
    async fn create(&self, job: &EndpointDeploymentJob) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO endpoint_deployment_jobs (id, status, endpoint_name, instance_type,
                                                  initial_instance_count, error_info,
                                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(job.id)
        .bind(job.status.as_str())
        .bind(&job.endpoint_name)
        .bind(&job.instance_type)
        .bind(job.initial_instance_count as i32)
        .bind(&job.error_info)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| map_insert_error(e, job.id))?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<EndpointDeploymentJob, StoreError> {
        let row = sqlx::query_as::<_, EndpointDeploymentJobRow>(
            r#"
            SELECT seq, id, status, endpoint_name, instance_type, initial_instance_count,
                   error_info, created_at, updated_at
            FROM endpoint_deployment_jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.ok_or(StoreError::NotFound(id))?.try_into()
    }

    async fn update(
        &self,
        id: Uuid,
        expected: JobStatus,
        mutator: Mutator<'_, EndpointDeploymentJob>,
    ) -> Result<EndpointDeploymentJob, StoreError> {
        let current = RecordStore::<EndpointDeploymentJob>::get(self, id).await?;
        if current.status != expected {
            return Err(StoreError::Conflict {
                id,
                expected,
                actual: current.status,
            });
        }

        let mut updated = current;
        mutator(&mut updated)?;

        let result = sqlx::query(
            r#"
            UPDATE endpoint_deployment_jobs
            SET status = $1, error_info = $2, updated_at = $3
            WHERE id = $4 AND status = $5
            "#,
        )
        .bind(updated.status.as_str())
        .bind(&updated.error_info)
        .bind(updated.updated_at)
        .bind(id)
        .bind(expected.as_str())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            let actual = RecordStore::<EndpointDeploymentJob>::get(self, id)
                .await?
                .status;
            return Err(StoreError::Conflict {
                id,
                expected,
                actual,
            });
        }

        Ok(updated)
    }

    async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<StorePage<EndpointDeploymentJob>, StoreError> {
        let after = match &page.token {
            Some(token) => position_to_seq(token)?,
            None => 0,
        };

        let rows = sqlx::query_as::<_, EndpointDeploymentJobRow>(
            r#"
            SELECT seq, id, status, endpoint_name, instance_type, initial_instance_count,
                   error_info, created_at, updated_at
            FROM endpoint_deployment_jobs
            WHERE seq > $1
            ORDER BY seq ASC
            LIMIT $2
            "#,
        )
        .bind(after)
        .bind(i64::from(page.limit) + 1)
        .fetch_all(self.pool())
        .await?;

        paginate(rows, page.limit, |row| row.seq)
    }
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct EndpointDeploymentJobRow {
    seq: i64,
    id: Uuid,
    status: String,
    endpoint_name: String,
    instance_type: String,
    initial_instance_count: i32,
    error_info: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<EndpointDeploymentJobRow> for EndpointDeploymentJob {
    type Error = StoreError;

    fn try_from(row: EndpointDeploymentJobRow) -> Result<Self, Self::Error> {
        let initial_instance_count = u32::try_from(row.initial_instance_count).map_err(|_| {
            StoreError::Corrupt(format!(
                "deployment {} has instance count {}",
                row.id, row.initial_instance_count
            ))
        })?;

        Ok(EndpointDeploymentJob {
            id: row.id,
            status: parse_status(&row.status)?,
            endpoint_name: row.endpoint_name,
            instance_type: row.instance_type,
            initial_instance_count,
            error_info: row.error_info,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
