use async_trait::async_trait;
use sqlx::PgPool;

use sentinel_core::domain::{HealthStatus, ProbeLog};
use sentinel_core::repo::ProbeLogRepository;
use sentinel_core::Result as CoreResult;

#[derive(sqlx::FromRow)]
struct ProbeLogRow {
    id: i64,
    website_id: i64,
    status_code: i32,
    latency_ms: i32,
    health_status: String,
    error_message: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

fn parse_health_status(s: &str) -> HealthStatus {
    match s {
        "UNHEALTHY" => HealthStatus::Unhealthy,
        _ => HealthStatus::Healthy,
    }
}

impl From<ProbeLogRow> for ProbeLog {
    fn from(row: ProbeLogRow) -> Self {
        ProbeLog {
            id: row.id as u64,
            website_id: row.website_id as u64,
            status_code: row.status_code as u32,
            latency_ms: row.latency_ms as u32,
            health_status: parse_health_status(&row.health_status),
            error_message: row.error_message,
            created_at: row.created_at,
        }
    }
}

pub struct PgProbeLogRepository {
    pool: PgPool,
}

impl PgProbeLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProbeLogRepository for PgProbeLogRepository {
    async fn create(&self, log: &ProbeLog) -> CoreResult<ProbeLog> {
        let row: ProbeLogRow = sqlx::query_as(
            r#"
            INSERT INTO probe_logs (website_id, status_code, latency_ms, health_status, error_message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, website_id, status_code, latency_ms, health_status, error_message, created_at
            "#,
        )
        .bind(log.website_id as i64)
        .bind(log.status_code as i32)
        .bind(log.latency_ms as i32)
        .bind(log.health_status.as_str())
        .bind(&log.error_message)
        .fetch_one(&self.pool)
        .await
        .map_err(crate::Error::from)?;
        Ok(row.into())
    }

    async fn recent_by_website_id(&self, website_id: u64, limit: u32) -> CoreResult<Vec<ProbeLog>> {
        let rows: Vec<ProbeLogRow> = sqlx::query_as(
            r#"
            SELECT id, website_id, status_code, latency_ms, health_status, error_message, created_at
            FROM probe_logs
            WHERE website_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(website_id as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(crate::Error::from)?;
        Ok(rows.into_iter().map(ProbeLog::from).collect())
    }
}
