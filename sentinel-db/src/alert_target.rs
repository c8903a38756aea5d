use async_trait::async_trait;
use sqlx::PgPool;

use sentinel_core::domain::{AlertTarget, TargetType};
use sentinel_core::repo::AlertTargetRepository;
use sentinel_core::Result as CoreResult;

#[derive(sqlx::FromRow)]
struct AlertTargetRow {
    id: i64,
    alert_config_id: i64,
    target_type: String,
    target_value: String,
    is_active: bool,
}

impl From<AlertTargetRow> for AlertTarget {
    fn from(row: AlertTargetRow) -> Self {
        AlertTarget {
            id: row.id as u64,
            alert_config_id: row.alert_config_id as u64,
            target_type: match row.target_type.as_str() {
                "sms" => TargetType::Sms,
                _ => TargetType::Email,
            },
            target_value: row.target_value,
            is_active: row.is_active,
        }
    }
}

pub struct PgAlertTargetRepository {
    pool: PgPool,
}

impl PgAlertTargetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertTargetRepository for PgAlertTargetRepository {
    async fn find_active_by_alert_config_id(
        &self,
        alert_config_id: u64,
    ) -> CoreResult<Vec<AlertTarget>> {
        let rows: Vec<AlertTargetRow> = sqlx::query_as(
            "SELECT id, alert_config_id, target_type, target_value, is_active FROM alert_targets WHERE alert_config_id = $1 AND is_active = true",
        )
        .bind(alert_config_id as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(crate::Error::from)?;
        Ok(rows.into_iter().map(AlertTarget::from).collect())
    }
}
