//! Incident Evaluator: pure decision logic, kept free of I/O so the
//! hysteresis table can be unit tested without a database or a live probe.

use sentinel_core::domain::{HealthStatus, Incident, ProbeLog};

/// A single probe is UNHEALTHY if the status looks like an error (or the
/// transport failed outright, `status_code == 0`), or if it was slow enough
/// to breach the website's latency threshold.
pub fn verdict_for(status_code: u32, latency_ms: u32, latency_threshold_ms: u32) -> HealthStatus {
    if status_code >= 400 || status_code == 0 || latency_ms >= latency_threshold_ms {
        HealthStatus::Unhealthy
    } else {
        HealthStatus::Healthy
    }
}

/// Cumulative status over the last `window` probe logs (most recent first):
/// HEALTHY if any of them is healthy, UNHEALTHY only if every one of them
/// is unhealthy. Returns `None` while fewer than `window` records exist yet
/// (bootstrap suppression — a brand new website shouldn't trip an incident
/// off a single bad probe).
pub fn cumulative_status(recent_logs: &[ProbeLog], window: u32) -> Option<HealthStatus> {
    if recent_logs.len() < window as usize {
        return None;
    }
    let considered = &recent_logs[..window as usize];
    if considered.iter().any(|l| l.health_status == HealthStatus::Healthy) {
        Some(HealthStatus::Healthy)
    } else {
        Some(HealthStatus::Unhealthy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Noop,
    CreateAndNotify,
    Notify,
    ResolveAndNotify,
}

/// The state-machine at the heart of the monitor pipeline: given whatever
/// incident is currently open (if any), the cumulative hysteresis status,
/// and this probe's own verdict, decide what to do.
pub fn decide_action(
    existing_incident: Option<&Incident>,
    cumulative: HealthStatus,
    current: HealthStatus,
) -> Action {
    match (existing_incident, cumulative) {
        (None, HealthStatus::Healthy) => Action::Noop,
        (None, HealthStatus::Unhealthy) => Action::CreateAndNotify,
        (Some(_), HealthStatus::Unhealthy) if current == HealthStatus::Unhealthy => Action::Notify,
        (Some(_), HealthStatus::Unhealthy) => Action::ResolveAndNotify,
        (Some(_), HealthStatus::Healthy) => Action::ResolveAndNotify,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn log(status: HealthStatus) -> ProbeLog {
        ProbeLog {
            id: 1,
            website_id: 1,
            status_code: if status == HealthStatus::Healthy { 200 } else { 500 },
            latency_ms: 100,
            health_status: status,
            error_message: None,
            created_at: Utc::now(),
        }
    }

    fn incident(status: HealthStatus) -> Incident {
        Incident {
            id: 1,
            website_id: 1,
            health_status: status,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn verdict_flags_error_status_transport_failure_and_slow_latency() {
        assert_eq!(verdict_for(200, 100, 5000), HealthStatus::Healthy);
        assert_eq!(verdict_for(500, 100, 5000), HealthStatus::Unhealthy);
        assert_eq!(verdict_for(0, 100, 5000), HealthStatus::Unhealthy);
        assert_eq!(verdict_for(200, 5000, 5000), HealthStatus::Unhealthy);
    }

    #[test]
    fn cumulative_status_is_none_during_bootstrap() {
        let logs = vec![log(HealthStatus::Unhealthy), log(HealthStatus::Unhealthy)];
        assert_eq!(cumulative_status(&logs, 3), None);
    }

    #[test]
    fn cumulative_status_is_healthy_if_any_record_is_healthy() {
        let logs = vec![
            log(HealthStatus::Unhealthy),
            log(HealthStatus::Healthy),
            log(HealthStatus::Unhealthy),
        ];
        assert_eq!(cumulative_status(&logs, 3), Some(HealthStatus::Healthy));
    }

    #[test]
    fn cumulative_status_is_unhealthy_only_if_all_records_are_unhealthy() {
        let logs = vec![
            log(HealthStatus::Unhealthy),
            log(HealthStatus::Unhealthy),
            log(HealthStatus::Unhealthy),
        ];
        assert_eq!(cumulative_status(&logs, 3), Some(HealthStatus::Unhealthy));
    }

    #[test]
    fn no_incident_and_healthy_is_a_noop() {
        assert_eq!(
            decide_action(None, HealthStatus::Healthy, HealthStatus::Healthy),
            Action::Noop
        );
    }

    #[test]
    fn no_incident_and_unhealthy_creates_and_notifies() {
        assert_eq!(
            decide_action(None, HealthStatus::Unhealthy, HealthStatus::Unhealthy),
            Action::CreateAndNotify
        );
    }

    #[test]
    fn open_incident_still_unhealthy_with_unhealthy_current_renotifies() {
        let open = incident(HealthStatus::Unhealthy);
        assert_eq!(
            decide_action(Some(&open), HealthStatus::Unhealthy, HealthStatus::Unhealthy),
            Action::Notify
        );
    }

    #[test]
    fn open_incident_recovering_to_healthy_current_resolves() {
        let open = incident(HealthStatus::Unhealthy);
        assert_eq!(
            decide_action(Some(&open), HealthStatus::Unhealthy, HealthStatus::Healthy),
            Action::ResolveAndNotify
        );
    }

    #[test]
    fn open_incident_with_cumulative_healthy_resolves() {
        let open = incident(HealthStatus::Unhealthy);
        assert_eq!(
            decide_action(Some(&open), HealthStatus::Healthy, HealthStatus::Healthy),
            Action::ResolveAndNotify
        );
    }
}
