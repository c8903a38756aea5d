//! Notifier Orchestrator: long-polls the incident-event queue and hands
//! each message to a worker pool that renders and sends the alert email.
//! A message is deleted from the queue only after a successful send —
//! anything else is left for SQS-driven at-least-once redelivery.

use std::sync::Arc;

use sentinel_core::domain::IncidentEventMessage;
use sentinel_core::repo::IncidentEventRepository;
use sentinel_db::Repositories;
use sentinel_mailer::{EmailData, Mailer};
use sentinel_queue::{QueueAdapter, ReceivedMessage};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::config::NotifierConfig;

pub async fn run(
    repos: Repositories,
    mailer: Arc<dyn Mailer>,
    queue: Arc<dyn QueueAdapter>,
    config: NotifierConfig,
) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let deadline_token = token.clone();
    let job_timeout = config.job_timeout;
    let deadline_guard = tokio::spawn(async move {
        tokio::time::sleep(job_timeout).await;
        deadline_token.cancel();
    });

    let (tx, rx) = mpsc::channel::<ReceivedMessage>(config.channel_buffer);
    let rx = Arc::new(Mutex::new(rx));

    let producer = tokio::spawn(pull(queue.clone(), tx, config.clone(), token.clone()));

    let mut workers = Vec::with_capacity(config.worker_count);
    for worker_id in 0..config.worker_count {
        let rx = rx.clone();
        let repos = repos.clone();
        let mailer = mailer.clone();
        let queue = queue.clone();
        workers.push(tokio::spawn(async move {
            worker_loop(worker_id, rx, repos, mailer, queue).await;
        }));
    }

    if let Err(err) = producer.await {
        tracing::error!(error = %err, "queue poller task panicked");
    }
    for (idx, handle) in workers.into_iter().enumerate() {
        if let Err(err) = handle.await {
            tracing::error!(worker_id = idx, error = %err, "delivery worker task panicked");
        }
    }

    deadline_guard.abort();
    Ok(())
}

async fn pull(
    queue: Arc<dyn QueueAdapter>,
    tx: mpsc::Sender<ReceivedMessage>,
    config: NotifierConfig,
    token: CancellationToken,
) {
    loop {
        if token.is_cancelled() {
            break;
        }

        let received = tokio::select! {
            _ = token.cancelled() => break,
            result = queue.receive(
                config.max_messages_per_receive,
                config.wait_time_secs,
                config.visibility_timeout_secs,
            ) => result,
        };

        match received {
            Ok(messages) => {
                for message in messages {
                    if tx.send(message).await.is_err() {
                        return;
                    }
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to receive from queue");
            }
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<ReceivedMessage>>>,
    repos: Repositories,
    mailer: Arc<dyn Mailer>,
    queue: Arc<dyn QueueAdapter>,
) {
    loop {
        let message = {
            let mut rx = rx.lock().await;
            rx.recv().await
        };
        let Some(message) = message else {
            break;
        };

        match handle_message(&message, repos.incident_events.as_ref(), &mailer).await {
            Ok(()) => {
                if let Err(err) = queue.delete(&message.receipt_handle).await {
                    tracing::error!(worker_id, error = %err, "failed to delete delivered message");
                }
            }
            Err(err) => {
                tracing::warn!(worker_id, error = %err, "leaving message for redelivery");
            }
        }
    }
}

async fn handle_message(
    message: &ReceivedMessage,
    incident_events: &dyn IncidentEventRepository,
    mailer: &Arc<dyn Mailer>,
) -> anyhow::Result<()> {
    let parsed: IncidentEventMessage = serde_json::from_str(&message.body)?;

    let Some(email) = parsed.email.as_ref() else {
        tracing::warn!("incident event has no email target (SMS-only target), skipping");
        return Ok(());
    };

    let incident_event = incident_events
        .find_by_external_id(&parsed.incident_event_id)
        .await?;

    let send_result = mailer
        .send(&EmailData {
            to: email.clone(),
            website_url: parsed.website_url.clone(),
            status: parsed.status,
        })
        .await;

    if let Some(incident_event) = incident_event {
        match send_result {
            Ok(()) => incident_events.mark_delivered(incident_event.id).await?,
            Err(ref err) => {
                incident_events.mark_failed(incident_event.id).await?;
                tracing::error!(error = %err, "email delivery failed");
            }
        }
    }

    send_result.map_err(anyhow::Error::from)
}
