//! Paket delivery tracking service.
//!
//! Main entry point for the paket server. Initializes all subsystems and
//! coordinates graceful startup and shutdown: configuration, database
//! pool, carrier registry, background sync engine, and the HTTP server.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use paket_api::{AppState, Config};
use paket_core::{
    storage::{DeliveryStore, PgDeliveryStore},
    time::RealClock,
    UuidIdProvider,
};
use paket_providers::{NovaPost, ProviderHandle, ProviderRegistry, SwiftLine};
use paket_tracking::{DeliveryCreator, StatusUpdater, SyncEngine, WebhookReconciler};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config);

    info!("Starting paket delivery tracking service");
    info!(
        database_url = %config.database_url_masked(),
        host = %config.host,
        port = config.port,
        max_connections = config.database_max_connections,
        "Configuration loaded"
    );

    let db_pool = create_database_pool(&config).await?;
    info!("Database connection pool established");

    run_migrations(&db_pool).await?;
    info!("Database migrations completed");

    let store: Arc<dyn DeliveryStore> = Arc::new(PgDeliveryStore::new(db_pool.clone()));
    let registry = Arc::new(ProviderRegistry::new(vec![
        ProviderHandle::Pull(Arc::new(NovaPost::new())),
        ProviderHandle::Push(Arc::new(SwiftLine::new())),
    ]));
    let updater = StatusUpdater::new(store.clone());
    let creator = Arc::new(DeliveryCreator::new(
        store.clone(),
        registry.clone(),
        Arc::new(UuidIdProvider::new()),
    ));
    let reconciler = Arc::new(WebhookReconciler::new(store.clone(), updater.clone()));

    let mut engine = SyncEngine::new(
        store.clone(),
        registry,
        updater,
        Arc::new(RealClock::new()),
        config.sync_config(),
    );
    engine.start();
    info!(poll_interval_secs = config.sync_poll_interval_secs, "Sync engine started");

    let state = AppState::new(store, creator, reconciler);
    let addr = config.parse_server_addr()?;

    paket_api::start_server(state, addr, config.request_timeout())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped, draining background work");
    engine.stop().await;
    info!("Sync engine stopped");

    db_pool.close().await;
    info!("Database connections closed");

    info!("Paket shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing(config: &Config) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.rust_log))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Creates the database connection pool with retry logic.
async fn create_database_pool(config: &Config) -> Result<sqlx::PgPool> {
    let mut retries = 0;
    const MAX_RETRIES: u32 = 5;
    const RETRY_DELAY: Duration = Duration::from_secs(2);

    loop {
        match PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connection_timeout))
            .idle_timeout(Duration::from_secs(config.database_idle_timeout))
            .max_lifetime(Duration::from_secs(config.database_max_lifetime))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => {
                // Verify connection works
                sqlx::query("SELECT 1")
                    .fetch_one(&pool)
                    .await
                    .context("Failed to verify database connection")?;

                return Ok(pool);
            },
            Err(_e) if retries < MAX_RETRIES => {
                retries += 1;
                info!(
                    attempt = retries,
                    max_retries = MAX_RETRIES,
                    "Database connection failed, retrying..."
                );
                tokio::time::sleep(RETRY_DELAY).await;
            },
            Err(e) => {
                return Err(e).context("Failed to create database connection pool after retries");
            },
        }
    }
}

/// Runs database migrations.
async fn run_migrations(pool: &sqlx::PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS deliveries (
            id TEXT PRIMARY KEY,
            order_id TEXT NOT NULL UNIQUE,
            provider TEXT NOT NULL,
            tracking_number TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL,
            label_url TEXT NOT NULL,
            shipping_address JSONB NOT NULL,
            customer_info JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create deliveries table")?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_deliveries_status
        ON deliveries(status, created_at)
        WHERE status IN ('PENDING', 'CONFIRMED', 'IN_TRANSIT')
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create deliveries status index")?;

    Ok(())
}
