//! Notifier Orchestrator binary: one bounded tick draining the
//! incident-event queue. Meant to be invoked periodically by an external
//! scheduler, same as `monitor-websites`.

use std::sync::Arc;

use sentinel_db::{connect, run_migrations, PoolConfig, Repositories};
use sentinel_mailer::SendGridMailer;
use sentinel_notifier::NotifierConfig;
use sentinel_queue::SqsQueue;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentinel_notifier=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("starting notify-users tick");

    let pool_config = PoolConfig::from_env();
    let pool = connect(&pool_config).await?;
    run_migrations(&pool).await?;
    let repos = Repositories::new(pool);

    let api_key = std::env::var("SENDGRID_API_KEY").expect("SENDGRID_API_KEY must be set");
    let from_address = std::env::var("SENTINEL_FROM_ADDRESS")
        .unwrap_or_else(|_| "alerts@sentinel.invalid".to_string());
    let mailer = Arc::new(SendGridMailer::new(api_key, from_address));

    let queue_url = std::env::var("SENTINEL_INCIDENT_QUEUE_URL")
        .expect("SENTINEL_INCIDENT_QUEUE_URL must be set");
    let queue = Arc::new(SqsQueue::from_env(queue_url).await);

    let config = NotifierConfig::from_env();
    tracing::info!(
        worker_count = config.worker_count,
        job_timeout_secs = config.job_timeout.as_secs(),
        "tick configuration"
    );

    sentinel_notifier::run(repos, mailer, queue, config).await?;

    tracing::info!("notify-users tick complete");
    Ok(())
}
