use async_trait::async_trait;
use sqlx::PgPool;

use sentinel_core::domain::{HealthStatus, Incident};
use sentinel_core::repo::IncidentRepository;
use sentinel_core::{Error as CoreError, Result as CoreResult};

#[derive(sqlx::FromRow)]
struct IncidentRow {
    id: i64,
    website_id: i64,
    health_status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<IncidentRow> for Incident {
    fn from(row: IncidentRow) -> Self {
        Incident {
            id: row.id as u64,
            website_id: row.website_id as u64,
            health_status: match row.health_status.as_str() {
                "UNHEALTHY" => HealthStatus::Unhealthy,
                _ => HealthStatus::Healthy,
            },
            created_at: row.created_at,
            deleted_at: row.deleted_at,
        }
    }
}

pub struct PgIncidentRepository {
    pool: PgPool,
}

impl PgIncidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IncidentRepository for PgIncidentRepository {
    async fn find_open_by_website_id(&self, website_id: u64) -> CoreResult<Option<Incident>> {
        let row: Option<IncidentRow> = sqlx::query_as(
            "SELECT id, website_id, health_status, created_at, deleted_at FROM incidents WHERE website_id = $1 AND deleted_at IS NULL",
        )
        .bind(website_id as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::Error::from)?;
        Ok(row.map(Incident::from))
    }

    async fn create(&self, website_id: u64, health_status: HealthStatus) -> CoreResult<Incident> {
        let row: IncidentRow = sqlx::query_as(
            r#"
            INSERT INTO incidents (website_id, health_status)
            VALUES ($1, $2)
            RETURNING id, website_id, health_status, created_at, deleted_at
            "#,
        )
        .bind(website_id as i64)
        .bind(health_status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(crate::Error::from)?;
        Ok(row.into())
    }

    async fn resolve(&self, id: u64) -> CoreResult<()> {
        let affected = sqlx::query("UPDATE incidents SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id as i64)
            .execute(&self.pool)
            .await
            .map_err(crate::Error::from)?
            .rows_affected();
        if affected == 0 {
            return Err(CoreError::IncidentNotFound(id));
        }
        Ok(())
    }
}
