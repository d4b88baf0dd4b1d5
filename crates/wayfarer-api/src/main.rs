//! Wayfarer API server entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use wayfarer_api::config::AppConfig;
use wayfarer_api::error::AppError;
use wayfarer_api::state::AppState;
use wayfarer_api::telemetry;
use wayfarer_core::clock::SystemClock;
use wayfarer_core::deadline::StoreDeadline;
use wayfarer_core::lock::IdentityLocks;
use wayfarer_durable_store::migrations::MIGRATOR;
use wayfarer_durable_store::pg_location_repository::PgLocationRepository;
use wayfarer_durable_store::pg_player_repository::PgPlayerRepository;
use wayfarer_ephemeral_store::redis_ephemeral_store::RedisEphemeralStore;
use wayfarer_players::domain::credentials::AuthSettings;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    info!("Starting Wayfarer API server");

    let result = run(config).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "server stopped with an error");
    }

    telemetry.shutdown();
    result
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    let deadline = StoreDeadline::new(config.store_call_timeout);

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.store_call_timeout)
        .connect(&config.database_url)
        .await?;
    MIGRATOR.run(&pool).await?;

    let store = RedisEphemeralStore::connect(&config.redis_url, deadline)
        .await
        .map_err(AppError::Ephemeral)?;

    // Build application state.
    let app_state = AppState::new(
        Arc::new(PgPlayerRepository::with_deadline(pool.clone(), deadline)),
        Arc::new(PgLocationRepository::with_deadline(pool, deadline)),
        Arc::new(store),
        IdentityLocks::new(config.lock_wait_timeout),
        Arc::new(SystemClock),
        AuthSettings {
            secret: config.session_secret.clone(),
            token_ttl: config.auth_token_ttl,
        },
    );

    let app = wayfarer_api::app(app_state);

    // Start server.
    let addr = config.bind_addr()?;
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
