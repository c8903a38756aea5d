//! Property-based tests for the Incident Evaluator
//!
//! Uses proptest to verify the hysteresis state machine holds its
//! invariants across randomly generated probe histories and incident
//! states, not just the handful of cases spelled out in the unit tests.

use chrono::Utc;
use proptest::prelude::*;
use sentinel_core::domain::{HealthStatus, Incident, ProbeLog};
use sentinel_monitor::evaluator::{self, Action};

fn health_status_strategy() -> impl Strategy<Value = HealthStatus> {
    prop_oneof![Just(HealthStatus::Healthy), Just(HealthStatus::Unhealthy)]
}

fn log_with_status(status: HealthStatus) -> ProbeLog {
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

fn incident_with_status(status: HealthStatus) -> Incident {
    Incident {
        id: 1,
        website_id: 1,
        health_status: status,
        created_at: Utc::now(),
        deleted_at: None,
    }
}

proptest! {
    /// Property: a single probe's verdict depends only on status code and
    /// latency, never on ordering or any hidden state — calling it twice
    /// with the same inputs always agrees.
    #[test]
    fn verdict_for_is_deterministic(status_code in 0u32..600, latency_ms in 0u32..10_000, threshold in 1u32..10_000) {
        let a = evaluator::verdict_for(status_code, latency_ms, threshold);
        let b = evaluator::verdict_for(status_code, latency_ms, threshold);
        prop_assert_eq!(a, b);
    }

    /// Property: any status code below 400 that isn't a transport failure
    /// (0) and comes in under the latency threshold is always healthy.
    #[test]
    fn verdict_for_is_healthy_below_threshold_and_error_range(
        status_code in 200u32..400,
        threshold in 1u32..10_000,
    ) {
        let latency_ms = threshold.saturating_sub(1);
        prop_assert_eq!(
            evaluator::verdict_for(status_code, latency_ms, threshold),
            HealthStatus::Healthy
        );
    }

    /// Property: `cumulative_status` never returns `Some` for fewer than
    /// `window` records — bootstrap suppression holds for any window size.
    #[test]
    fn cumulative_status_respects_bootstrap_window(
        statuses in prop::collection::vec(health_status_strategy(), 0..8),
        window in 1u32..10,
    ) {
        let logs: Vec<ProbeLog> = statuses.into_iter().map(log_with_status).collect();
        let result = evaluator::cumulative_status(&logs, window);
        if logs.len() < window as usize {
            prop_assert_eq!(result, None);
        }
    }

    /// Property: `cumulative_status` is `Unhealthy` exactly when every one
    /// of the considered records is unhealthy, for any window-sized run.
    #[test]
    fn cumulative_status_matches_all_unhealthy_definition(
        statuses in prop::collection::vec(health_status_strategy(), 1..8),
    ) {
        let window = statuses.len() as u32;
        let logs: Vec<ProbeLog> = statuses.iter().copied().map(log_with_status).collect();
        let all_unhealthy = statuses.iter().all(|s| *s == HealthStatus::Unhealthy);
        let result = evaluator::cumulative_status(&logs, window).unwrap();
        prop_assert_eq!(result == HealthStatus::Unhealthy, all_unhealthy);
    }

    /// Property: `decide_action` never creates a new incident when one
    /// already exists, and never notifies-without-basis when no incident
    /// exists and the cumulative status is healthy.
    #[test]
    fn decide_action_never_creates_over_an_existing_incident(
        existing_status in health_status_strategy(),
        cumulative in health_status_strategy(),
        current in health_status_strategy(),
    ) {
        let existing = incident_with_status(existing_status);
        let action = evaluator::decide_action(Some(&existing), cumulative, current);
        prop_assert_ne!(action, Action::CreateAndNotify);
    }

    /// Property: with no open incident, `decide_action` is a no-op exactly
    /// when the cumulative status is healthy.
    #[test]
    fn decide_action_without_incident_is_noop_iff_cumulative_healthy(
        cumulative in health_status_strategy(),
        current in health_status_strategy(),
    ) {
        let action = evaluator::decide_action(None, cumulative, current);
        prop_assert_eq!(action == Action::Noop, cumulative == HealthStatus::Healthy);
    }
}
