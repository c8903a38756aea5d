//! Monitor Orchestrator: producer (Work Claimer) -> bounded channel ->
//! worker pool (Probe Executor + Incident Evaluator). One call to `run`
//! is one tick; an external scheduler decides how often to invoke it.

use std::sync::Arc;

use sentinel_core::domain::{
    AlertTarget, HealthStatus, IncidentEventMessage, TargetType, Website,
};
use sentinel_core::repo::{
    AlertConfigRepository, AlertTargetRepository, IncidentEventRepository, IncidentRepository,
    ProbeLogRepository, WebsiteRepository,
};
use sentinel_db::Repositories;
use sentinel_probe::ProbeExecutor;
use sentinel_queue::QueueAdapter;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::config::MonitorConfig;
use crate::evaluator::{self, Action};

pub async fn run(
    repos: Repositories,
    probe: Arc<dyn ProbeExecutor>,
    queue: Arc<dyn QueueAdapter>,
    config: MonitorConfig,
) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let deadline_token = token.clone();
    let job_timeout = config.job_timeout;
    let deadline_guard = tokio::spawn(async move {
        tokio::time::sleep(job_timeout).await;
        deadline_token.cancel();
    });

    let (tx, rx) = mpsc::channel::<Website>(config.channel_buffer);
    let rx = Arc::new(Mutex::new(rx));

    let producer = tokio::spawn(produce(
        repos.clone(),
        tx,
        config.batch_size,
        config.probe_period.as_secs() as u32,
        token.clone(),
    ));

    let mut workers = Vec::with_capacity(config.worker_count);
    for worker_id in 0..config.worker_count {
        let rx = rx.clone();
        let repos = repos.clone();
        let probe = probe.clone();
        let queue = queue.clone();
        let timeout = config.health_check_timeout;
        workers.push(tokio::spawn(async move {
            worker_loop(worker_id, rx, repos, probe, queue, timeout).await;
        }));
    }

    if let Err(err) = producer.await {
        tracing::error!(error = %err, "work claimer task panicked");
    }
    for (idx, handle) in workers.into_iter().enumerate() {
        if let Err(err) = handle.await {
            tracing::error!(worker_id = idx, error = %err, "probe worker task panicked");
        }
    }

    deadline_guard.abort();
    Ok(())
}

async fn produce(
    repos: Repositories,
    tx: mpsc::Sender<Website>,
    batch_size: u32,
    probe_period_secs: u32,
    token: CancellationToken,
) {
    loop {
        if token.is_cancelled() {
            break;
        }

        let batch = Arc::new(std::sync::Mutex::new(Vec::new()));
        let batch_clone = batch.clone();
        let claimed = repos
            .websites
            .with_claimed_batch(
                batch_size,
                probe_period_secs,
                Box::new(move |websites| {
                    *batch_clone.lock().unwrap() = websites;
                    Ok(())
                }),
            )
            .await;

        if let Err(err) = claimed {
            tracing::error!(error = %err, "failed to claim website batch");
            break;
        }

        let batch = Arc::try_unwrap(batch)
            .expect("closure ran synchronously, no other owner remains")
            .into_inner()
            .expect("mutex is never poisoned here");

        if batch.is_empty() {
            break;
        }

        for website in batch {
            tokio::select! {
                _ = token.cancelled() => return,
                send_result = tx.send(website) => {
                    if send_result.is_err() {
                        return;
                    }
                }
            }
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<Website>>>,
    repos: Repositories,
    probe: Arc<dyn ProbeExecutor>,
    queue: Arc<dyn QueueAdapter>,
    probe_timeout: std::time::Duration,
) {
    loop {
        let website = {
            let mut rx = rx.lock().await;
            rx.recv().await
        };
        let Some(website) = website else {
            break;
        };

        if let Err(err) = process_website(&website, &repos, &probe, &queue, probe_timeout).await {
            tracing::error!(worker_id, website_id = website.id, error = %err, "failed to process website");
        }
    }
}

async fn process_website(
    website: &Website,
    repos: &Repositories,
    probe: &Arc<dyn ProbeExecutor>,
    queue: &Arc<dyn QueueAdapter>,
    probe_timeout: std::time::Duration,
) -> anyhow::Result<()> {
    let outcome = match tokio::time::timeout(probe_timeout, probe.probe(&website.url)).await {
        Ok(result) => result?,
        Err(_) => sentinel_probe::ProbeOutcome {
            status_code: 0,
            latency_ms: probe_timeout.as_millis() as u32,
            error_message: Some("probe timed out".to_string()),
        },
    };

    let alert_config = match repos.alert_configs.find_by_website_id(website.id).await? {
        Some(config) if config.is_enabled => config,
        _ => {
            tracing::debug!(website_id = website.id, "probed but alerting disabled/unconfigured");
            let verdict = evaluator::verdict_for(
                outcome.status_code,
                outcome.latency_ms,
                sentinel_core::domain::AlertConfig::DEFAULT_LATENCY_THRESHOLD_MS,
            );
            repos
                .probe_logs
                .create(&log_from_outcome(website.id, &outcome, verdict))
                .await?;
            return Ok(());
        }
    };

    let verdict = evaluator::verdict_for(
        outcome.status_code,
        outcome.latency_ms,
        alert_config.latency_threshold_ms,
    );

    repos
        .probe_logs
        .create(&log_from_outcome(website.id, &outcome, verdict))
        .await?;

    let recent_logs = repos
        .probe_logs
        .recent_by_website_id(website.id, alert_config.failure_threshold)
        .await?;
    let Some(cumulative) = evaluator::cumulative_status(&recent_logs, alert_config.failure_threshold)
    else {
        tracing::debug!(website_id = website.id, "bootstrap window not yet full, skipping evaluation");
        return Ok(());
    };

    let existing_incident = repos.incidents.find_open_by_website_id(website.id).await?;
    let action = evaluator::decide_action(existing_incident.as_ref(), cumulative, verdict);

    match action {
        Action::Noop => {}
        Action::CreateAndNotify => {
            repos.incidents.create(website.id, HealthStatus::Unhealthy).await?;
            notify(repos, queue, website, &alert_config, HealthStatus::Unhealthy).await?;
        }
        Action::Notify => {
            notify(repos, queue, website, &alert_config, HealthStatus::Unhealthy).await?;
        }
        Action::ResolveAndNotify => {
            if let Some(incident) = existing_incident {
                repos.incidents.resolve(incident.id).await?;
            }
            notify(repos, queue, website, &alert_config, HealthStatus::Healthy).await?;
        }
    }

    Ok(())
}

fn log_from_outcome(
    website_id: u64,
    outcome: &sentinel_probe::ProbeOutcome,
    health_status: HealthStatus,
) -> sentinel_core::domain::ProbeLog {
    sentinel_core::domain::ProbeLog {
        id: 0,
        website_id,
        status_code: outcome.status_code,
        latency_ms: outcome.latency_ms,
        health_status,
        error_message: outcome.error_message.clone(),
        created_at: chrono::Utc::now(),
    }
}

async fn notify(
    repos: &Repositories,
    queue: &Arc<dyn QueueAdapter>,
    website: &Website,
    alert_config: &sentinel_core::domain::AlertConfig,
    status: HealthStatus,
) -> anyhow::Result<()> {
    let targets = repos
        .alert_targets
        .find_active_by_alert_config_id(alert_config.id)
        .await?;

    for target in targets {
        if target.target_type == TargetType::Sms {
            tracing::warn!(
                alert_target_id = target.id,
                "SMS alert targets are not deliverable yet, skipping"
            );
            continue;
        }
        send_one(repos, queue, website, status, &target).await?;
    }
    Ok(())
}

async fn send_one(
    repos: &Repositories,
    queue: &Arc<dyn QueueAdapter>,
    website: &Website,
    status: HealthStatus,
    target: &AlertTarget,
) -> anyhow::Result<()> {
    let event = sentinel_core::domain::IncidentEvent {
        id: 0,
        external_id: String::new(),
        website_url: website.url.clone(),
        health_status: status,
        alert_target_id: target.id,
        event_status: sentinel_core::domain::EventStatus::Pending,
        created_at: chrono::Utc::now(),
    };
    let created = repos.incident_events.create_pending(&event).await?;

    let message = IncidentEventMessage {
        website_url: website.url.clone(),
        phone_number: None,
        email: Some(target.target_value.clone()),
        status,
        incident_event_id: created.external_id.clone(),
    };
    let body = serde_json::to_string(&message)?;
    queue.send(&body).await?;
    Ok(())
}
