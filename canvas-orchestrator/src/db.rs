use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // seq gives listings a stable insertion order
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inference_jobs (
            seq BIGSERIAL UNIQUE,
            id UUID PRIMARY KEY,
            status VARCHAR(20) NOT NULL,
            endpoint_name VARCHAR(63) NOT NULL,
            request_payload_ref TEXT NOT NULL,
            output_location TEXT NOT NULL,
            parameters JSONB NOT NULL DEFAULT '{}',
            result_payload_ref TEXT,
            error_info TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS endpoint_deployment_jobs (
            seq BIGSERIAL UNIQUE,
            id UUID PRIMARY KEY,
            status VARCHAR(20) NOT NULL,
            endpoint_name VARCHAR(63) NOT NULL,
            instance_type VARCHAR(64) NOT NULL,
            initial_instance_count INTEGER NOT NULL,
            error_info TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_inference_jobs_status ON inference_jobs(status)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_inference_jobs_endpoint ON inference_jobs(endpoint_name)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_endpoint_deployment_jobs_status ON endpoint_deployment_jobs(status)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
