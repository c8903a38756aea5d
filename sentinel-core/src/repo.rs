//! Repository contracts.
//!
//! One narrow, named-query trait per entity rather than a single fat DAO —
//! callers depend only on the methods they actually use. `sentinel-db`
//! provides the Postgres implementation; tests provide in-memory ones.
//!
//! The batch claim is shaped as a closure-taking method (`with_claimed_batch`)
//! rather than returning an open transaction handle, so the transaction
//! boundary never leaks past the repository into caller code.

use async_trait::async_trait;

use crate::domain::{AlertConfig, AlertTarget, Incident, IncidentEvent, ProbeLog, Website};
use crate::Result;

#[async_trait]
pub trait WebsiteRepository: Send + Sync {
    /// Claims up to `limit` non-tombstoned websites due for a probe
    /// (`last_checked_at <= now() - probe_period_secs`), ordered by
    /// `last_checked_at` ascending, stamps their `last_checked_at` to now in
    /// the same transaction, and hands the claimed batch to `f`. Uses
    /// `SELECT ... FOR UPDATE SKIP LOCKED` under the hood so concurrent
    /// monitor processes never claim the same row twice.
    async fn with_claimed_batch(
        &self,
        limit: u32,
        probe_period_secs: u32,
        f: Box<dyn FnOnce(Vec<Website>) -> Result<()> + Send>,
    ) -> Result<()>;

    async fn find_by_id(&self, id: u64) -> Result<Option<Website>>;
    async fn create(&self, url: &str, owner_user_id: u64) -> Result<Website>;
    async fn soft_delete(&self, id: u64) -> Result<()>;
}

#[async_trait]
pub trait AlertConfigRepository: Send + Sync {
    async fn find_by_website_id(&self, website_id: u64) -> Result<Option<AlertConfig>>;
    async fn upsert(&self, config: &AlertConfig) -> Result<AlertConfig>;
}

#[async_trait]
pub trait AlertTargetRepository: Send + Sync {
    async fn find_active_by_alert_config_id(
        &self,
        alert_config_id: u64,
    ) -> Result<Vec<AlertTarget>>;
}

#[async_trait]
pub trait ProbeLogRepository: Send + Sync {
    async fn create(&self, log: &ProbeLog) -> Result<ProbeLog>;

    /// Most recent `limit` probe logs for `website_id`, newest first. Backs
    /// the hysteresis window in the Incident Evaluator.
    async fn recent_by_website_id(&self, website_id: u64, limit: u32) -> Result<Vec<ProbeLog>>;
}

#[async_trait]
pub trait IncidentRepository: Send + Sync {
    async fn find_open_by_website_id(&self, website_id: u64) -> Result<Option<Incident>>;
    async fn create(&self, website_id: u64, health_status: crate::domain::HealthStatus) -> Result<Incident>;
    async fn resolve(&self, id: u64) -> Result<()>;
}

#[async_trait]
pub trait IncidentEventRepository: Send + Sync {
    async fn create_pending(
        &self,
        incident_event: &IncidentEvent,
    ) -> Result<IncidentEvent>;
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<IncidentEvent>>;
    async fn mark_delivered(&self, id: u64) -> Result<()>;
    async fn mark_failed(&self, id: u64) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HealthStatus;
    use std::sync::Mutex;

    struct FakeWebsiteRepo {
        websites: Mutex<Vec<Website>>,
    }

    #[async_trait]
    impl WebsiteRepository for FakeWebsiteRepo {
        async fn with_claimed_batch(
            &self,
            limit: u32,
            probe_period_secs: u32,
            f: Box<dyn FnOnce(Vec<Website>) -> Result<()> + Send>,
        ) -> Result<()> {
            let cutoff = chrono::Utc::now() - chrono::Duration::seconds(probe_period_secs as i64);
            let batch: Vec<Website> = self
                .websites
                .lock()
                .unwrap()
                .iter()
                .filter(|w| w.last_checked_at <= cutoff)
                .take(limit as usize)
                .cloned()
                .collect();
            f(batch)
        }

        async fn find_by_id(&self, id: u64) -> Result<Option<Website>> {
            Ok(self
                .websites
                .lock()
                .unwrap()
                .iter()
                .find(|w| w.id == id)
                .cloned())
        }

        async fn create(&self, _url: &str, _owner_user_id: u64) -> Result<Website> {
            unimplemented!("not exercised by this test")
        }

        async fn soft_delete(&self, _id: u64) -> Result<()> {
            unimplemented!("not exercised by this test")
        }
    }

    #[tokio::test]
    async fn claimed_batch_is_bounded_by_limit() {
        let overdue = chrono::Utc::now() - chrono::Duration::minutes(10);
        let repo = FakeWebsiteRepo {
            websites: Mutex::new(
                (0..5)
                    .map(|i| Website {
                        id: i,
                        external_id: uuid::Uuid::new_v4().to_string(),
                        url: format!("https://example{i}.test"),
                        owner_user_id: 1,
                        last_checked_at: overdue,
                        deleted_at: None,
                    })
                    .collect(),
            ),
        };

        let mut seen = 0;
        repo.with_claimed_batch(
            3,
            180,
            Box::new(move |batch| {
                seen = batch.len();
                assert_eq!(seen, 3);
                Ok(())
            }),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn claimed_batch_excludes_websites_checked_within_the_probe_period() {
        let now = chrono::Utc::now();
        let repo = FakeWebsiteRepo {
            websites: Mutex::new(vec![
                Website {
                    id: 1,
                    external_id: uuid::Uuid::new_v4().to_string(),
                    url: "https://recently-checked.test".to_string(),
                    owner_user_id: 1,
                    last_checked_at: now,
                    deleted_at: None,
                },
                Website {
                    id: 2,
                    external_id: uuid::Uuid::new_v4().to_string(),
                    url: "https://overdue.test".to_string(),
                    owner_user_id: 1,
                    last_checked_at: now - chrono::Duration::minutes(5),
                    deleted_at: None,
                },
            ]),
        };

        let claimed_ids = std::sync::Arc::new(Mutex::new(Vec::new()));
        let claimed_ids_clone = claimed_ids.clone();
        repo.with_claimed_batch(
            10,
            180,
            Box::new(move |batch| {
                claimed_ids_clone
                    .lock()
                    .unwrap()
                    .extend(batch.into_iter().map(|w| w.id));
                Ok(())
            }),
        )
        .await
        .unwrap();

        assert_eq!(*claimed_ids.lock().unwrap(), vec![2]);
    }

    #[test]
    fn health_status_display_matches_wire_format() {
        assert_eq!(HealthStatus::Healthy.to_string(), "HEALTHY");
        assert_eq!(HealthStatus::Unhealthy.to_string(), "UNHEALTHY");
    }
}
