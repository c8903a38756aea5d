use async_trait::async_trait;
use sqlx::PgPool;

use sentinel_core::domain::{EventStatus, HealthStatus, IncidentEvent};
use sentinel_core::repo::IncidentEventRepository;
use sentinel_core::Result as CoreResult;

#[derive(sqlx::FromRow)]
struct IncidentEventRow {
    id: i64,
    external_id: uuid::Uuid,
    website_url: String,
    health_status: String,
    alert_target_id: i64,
    event_status: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<IncidentEventRow> for IncidentEvent {
    fn from(row: IncidentEventRow) -> Self {
        IncidentEvent {
            id: row.id as u64,
            external_id: row.external_id.to_string(),
            website_url: row.website_url,
            health_status: match row.health_status.as_str() {
                "UNHEALTHY" => HealthStatus::Unhealthy,
                _ => HealthStatus::Healthy,
            },
            alert_target_id: row.alert_target_id as u64,
            event_status: match row.event_status.as_str() {
                "DELIVERED" => EventStatus::Delivered,
                "FAILED" => EventStatus::Failed,
                _ => EventStatus::Pending,
            },
            created_at: row.created_at,
        }
    }
}

pub struct PgIncidentEventRepository {
    pool: PgPool,
}

impl PgIncidentEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IncidentEventRepository for PgIncidentEventRepository {
    async fn create_pending(&self, incident_event: &IncidentEvent) -> CoreResult<IncidentEvent> {
        let row: IncidentEventRow = sqlx::query_as(
            r#"
            INSERT INTO incident_events (website_url, health_status, alert_target_id, event_status)
            VALUES ($1, $2, $3, 'PENDING')
            RETURNING id, external_id, website_url, health_status, alert_target_id, event_status, created_at
            "#,
        )
        .bind(&incident_event.website_url)
        .bind(incident_event.health_status.as_str())
        .bind(incident_event.alert_target_id as i64)
        .fetch_one(&self.pool)
        .await
        .map_err(crate::Error::from)?;
        Ok(row.into())
    }

    async fn find_by_external_id(&self, external_id: &str) -> CoreResult<Option<IncidentEvent>> {
        let parsed: uuid::Uuid = match external_id.parse() {
            Ok(id) => id,
            Err(_) => return Ok(None),
        };
        let row: Option<IncidentEventRow> = sqlx::query_as(
            "SELECT id, external_id, website_url, health_status, alert_target_id, event_status, created_at FROM incident_events WHERE external_id = $1",
        )
        .bind(parsed)
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::Error::from)?;
        Ok(row.map(IncidentEvent::from))
    }

    async fn mark_delivered(&self, id: u64) -> CoreResult<()> {
        sqlx::query("UPDATE incident_events SET event_status = 'DELIVERED' WHERE id = $1")
            .bind(id as i64)
            .execute(&self.pool)
            .await
            .map_err(crate::Error::from)?;
        Ok(())
    }

    async fn mark_failed(&self, id: u64) -> CoreResult<()> {
        sqlx::query("UPDATE incident_events SET event_status = 'FAILED' WHERE id = $1")
            .bind(id as i64)
            .execute(&self.pool)
            .await
            .map_err(crate::Error::from)?;
        Ok(())
    }
}
