//! Postgres persistence facade.
//!
//! One repository struct per entity, each implementing the narrow trait
//! contracts declared in `sentinel_core::repo`. Callers depend on those
//! traits, not on this crate, so tests can swap in in-memory fakes without
//! a database.

mod alert_config;
mod alert_target;
mod error;
mod incident;
mod incident_event;
mod pool;
mod probe_log;
mod website;

pub use alert_config::PgAlertConfigRepository;
pub use alert_target::PgAlertTargetRepository;
pub use error::Error;
pub use incident::PgIncidentRepository;
pub use incident_event::PgIncidentEventRepository;
pub use pool::{connect, run_migrations, PoolConfig};
pub use probe_log::PgProbeLogRepository;
pub use website::PgWebsiteRepository;

pub type Result<T> = std::result::Result<T, Error>;

use sqlx::PgPool;
use std::sync::Arc;

/// Bundles one repository of each kind behind a shared pool. Orchestrators
/// take a `Repositories` by value rather than reaching for individual
/// globals.
#[derive(Clone)]
pub struct Repositories {
    pub websites: Arc<PgWebsiteRepository>,
    pub alert_configs: Arc<PgAlertConfigRepository>,
    pub alert_targets: Arc<PgAlertTargetRepository>,
    pub probe_logs: Arc<PgProbeLogRepository>,
    pub incidents: Arc<PgIncidentRepository>,
    pub incident_events: Arc<PgIncidentEventRepository>,
}

impl Repositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            websites: Arc::new(PgWebsiteRepository::new(pool.clone())),
            alert_configs: Arc::new(PgAlertConfigRepository::new(pool.clone())),
            alert_targets: Arc::new(PgAlertTargetRepository::new(pool.clone())),
            probe_logs: Arc::new(PgProbeLogRepository::new(pool.clone())),
            incidents: Arc::new(PgIncidentRepository::new(pool.clone())),
            incident_events: Arc::new(PgIncidentEventRepository::new(pool)),
        }
    }
}
