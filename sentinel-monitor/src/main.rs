//! Monitor Orchestrator binary: one bounded tick of the claim/probe/evaluate
//! pipeline. Meant to be invoked periodically by an external scheduler.

use std::sync::Arc;
use std::time::Duration;

use sentinel_db::{connect, run_migrations, PoolConfig, Repositories};
use sentinel_monitor::MonitorConfig;
use sentinel_probe::HttpProbeExecutor;
use sentinel_queue::SqsQueue;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentinel_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("starting monitor-websites tick");

    let pool_config = PoolConfig::from_env();
    let pool = connect(&pool_config).await?;
    run_migrations(&pool).await?;
    let repos = Repositories::new(pool);

    let probe = Arc::new(HttpProbeExecutor::new(Duration::from_secs(10)));

    let queue_url = std::env::var("SENTINEL_INCIDENT_QUEUE_URL")
        .expect("SENTINEL_INCIDENT_QUEUE_URL must be set");
    let queue = Arc::new(SqsQueue::from_env(queue_url).await);

    let config = MonitorConfig::from_env();
    tracing::info!(
        batch_size = config.batch_size,
        worker_count = config.worker_count,
        job_timeout_secs = config.job_timeout.as_secs(),
        "tick configuration"
    );

    sentinel_monitor::run(repos, probe, queue, config).await?;

    tracing::info!("monitor-websites tick complete");
    Ok(())
}
