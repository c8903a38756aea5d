//! Entities shared by the monitor and notifier pipelines.
//!
//! These mirror the relational schema in `sentinel-db` one-for-one; the
//! split exists so that pure business logic (the Incident Evaluator, the
//! hysteresis table) can be unit tested without a database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A monitored website. Owned by a user outside the core (registration API).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Website {
    pub id: u64,
    pub external_id: String,
    pub url: String,
    pub owner_user_id: u64,
    pub last_checked_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Website {
    pub fn is_tombstoned(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// One alert configuration per website (1:1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    pub id: u64,
    pub website_id: u64,
    pub failure_threshold: u32,
    pub latency_threshold_ms: u32,
    pub is_enabled: bool,
}

impl AlertConfig {
    pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;
    pub const DEFAULT_LATENCY_THRESHOLD_MS: u32 = 5000;
}

/// Destination for an incident notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Email,
    Sms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertTarget {
    pub id: u64,
    pub alert_config_id: u64,
    pub target_type: TargetType,
    pub target_value: String,
    pub is_active: bool,
}

/// The HEALTHY/UNHEALTHY verdict assigned to a single probe, or computed
/// cumulatively over a hysteresis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "HEALTHY",
            HealthStatus::Unhealthy => "UNHEALTHY",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of one probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeLog {
    pub id: u64,
    pub website_id: u64,
    pub status_code: u32,
    pub latency_ms: u32,
    pub health_status: HealthStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// At most one non-tombstoned row per website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: u64,
    pub website_id: u64,
    pub health_status: HealthStatus,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventStatus {
    Pending,
    Delivered,
    Failed,
}

/// One row per delivery attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentEvent {
    pub id: u64,
    pub external_id: String,
    pub website_url: String,
    pub health_status: HealthStatus,
    pub alert_target_id: u64,
    pub event_status: EventStatus,
    pub created_at: DateTime<Utc>,
}

/// Wire message published to the durable queue by the monitor pipeline and
/// consumed by the notifier pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentEventMessage {
    pub website_url: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub status: HealthStatus,
    pub incident_event_id: String,
}
