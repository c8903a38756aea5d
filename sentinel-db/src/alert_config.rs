use async_trait::async_trait;
use sqlx::PgPool;

use sentinel_core::domain::AlertConfig;
use sentinel_core::repo::AlertConfigRepository;
use sentinel_core::Result as CoreResult;

#[derive(sqlx::FromRow)]
struct AlertConfigRow {
    id: i64,
    website_id: i64,
    failure_threshold: i32,
    latency_threshold_ms: i32,
    is_enabled: bool,
}

impl From<AlertConfigRow> for AlertConfig {
    fn from(row: AlertConfigRow) -> Self {
        AlertConfig {
            id: row.id as u64,
            website_id: row.website_id as u64,
            failure_threshold: row.failure_threshold as u32,
            latency_threshold_ms: row.latency_threshold_ms as u32,
            is_enabled: row.is_enabled,
        }
    }
}

pub struct PgAlertConfigRepository {
    pool: PgPool,
}

impl PgAlertConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertConfigRepository for PgAlertConfigRepository {
    async fn find_by_website_id(&self, website_id: u64) -> CoreResult<Option<AlertConfig>> {
        let row: Option<AlertConfigRow> = sqlx::query_as(
            "SELECT id, website_id, failure_threshold, latency_threshold_ms, is_enabled FROM alert_configs WHERE website_id = $1",
        )
        .bind(website_id as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::Error::from)?;
        Ok(row.map(AlertConfig::from))
    }

    async fn upsert(&self, config: &AlertConfig) -> CoreResult<AlertConfig> {
        let row: AlertConfigRow = sqlx::query_as(
            r#"
            INSERT INTO alert_configs (website_id, failure_threshold, latency_threshold_ms, is_enabled)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (website_id) DO UPDATE SET
                failure_threshold = EXCLUDED.failure_threshold,
                latency_threshold_ms = EXCLUDED.latency_threshold_ms,
                is_enabled = EXCLUDED.is_enabled
            RETURNING id, website_id, failure_threshold, latency_threshold_ms, is_enabled
            "#,
        )
        .bind(config.website_id as i64)
        .bind(config.failure_threshold as i32)
        .bind(config.latency_threshold_ms as i32)
        .bind(config.is_enabled)
        .fetch_one(&self.pool)
        .await
        .map_err(crate::Error::from)?;
        Ok(row.into())
    }
}
