//! Registration HTTP API server.

use sentinel_api::{create_router, AppState};
use sentinel_db::{connect, run_migrations, PoolConfig, Repositories};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentinel_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("starting sentinel registration API");

    let pool_config = PoolConfig::from_env();
    let pool = connect(&pool_config).await?;
    run_migrations(&pool).await?;
    let repos = Repositories::new(pool);

    let state = AppState { repos };
    let app = create_router(state)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default().include_headers(true)))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new());

    let host = std::env::var("SENTINEL_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("SENTINEL_API_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
