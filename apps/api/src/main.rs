mod auth;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::cache::{CacheConfig, PermissionCache};
use crate::auth::registry::PermissionRegistry;
use crate::auth::store::PgPermissionStore;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::screening::extract::FileTextExtractor;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recruit API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, 10).await?;

    // Permission cache over the relational store
    let permission_store = Arc::new(PgPermissionStore::new(db.clone()));
    let permission_cache = Arc::new(PermissionCache::new(
        permission_store,
        CacheConfig {
            idle_ttl: config.permission_cache_idle,
            absolute_ttl: config.permission_cache_absolute,
        },
    ));
    info!(
        idle_secs = config.permission_cache_idle.as_secs(),
        absolute_secs = config.permission_cache_absolute.as_secs(),
        "Permission cache initialized"
    );

    // Declared permission requirements, registered once at startup
    let registry = Arc::new(PermissionRegistry::with_defaults());

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        permission_cache,
        registry,
        extractor: Arc::new(FileTextExtractor),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
