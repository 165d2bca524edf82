use anyhow::Result;
use std::time::Duration;
use tracing::info;

use foodbridge_api::app::create_app;
use foodbridge_api::config::Config;
use foodbridge_api::jobs::{CleanupExpiredDonationsJob, JobScheduler, PoolMetricsJob};
use foodbridge_api::middleware::init_metrics;
use foodbridge_api::middleware::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging and the Prometheus recorder
    init_logging(&config.logging);
    init_metrics();

    info!("Starting FoodBridge API v{}", env!("CARGO_PKG_VERSION"));

    // Create database pool
    let pool = persistence::db::create_pool(&config.database_config()).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    // Start background jobs
    let mut scheduler = JobScheduler::new();
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    scheduler.register(CleanupExpiredDonationsJob::new(
        pool.clone(),
        config.retention.expired_retention_days,
    ));
    scheduler.start();

    // Build application
    let addr = config.socket_addr();
    let app = create_app(config, pool);

    // Start server
    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop background jobs once the server has drained
    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(5)).await;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Shutdown signal received");
}
