//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{seeded_store, PgDocumentStore},
    config::Config,
    error::ApiError,
    web::{build_router, AppState},
};
use chrono::Utc;
use mentorsphere_core::{DocumentStore, TieredStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Connects to Postgres and applies migrations. Any failure leaves the
/// service running on the in-memory dataset.
async fn connect_remote(config: &Config) -> Option<Arc<dyn DocumentStore>> {
    let url = match config.database_url.as_deref() {
        Some(url) => url,
        None => {
            warn!("DATABASE_URL is not set, serving the in-memory dataset only");
            return None;
        }
    };

    info!("Connecting to database...");
    let pool = match PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "Database unreachable, falling back to the in-memory dataset");
            return None;
        }
    };

    let store = PgDocumentStore::new(pool);
    info!("Running database migrations...");
    if let Err(e) = store.run_migrations().await {
        warn!(error = %e, "Migrations failed, falling back to the in-memory dataset");
        return None;
    }
    info!("Database migrations complete.");
    Some(Arc::new(store))
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Storage tiers ---
    let remote = connect_remote(&config).await;
    let local = seeded_store(Utc::now()).map_err(|e| ApiError::Internal(e.to_string()))?;
    let store = Arc::new(TieredStore::new(remote, Arc::new(local)));
    info!(tier = ?store.active_tier().await, "Storage ready");

    // --- 3. Shared state and router ---
    let app_state = Arc::new(AppState::new(config.clone(), store));
    let app = build_router(app_state);

    // --- 4. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
