use anyhow::Result;
use axum::{http::StatusCode, middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{CacheConfig, Config, DatabaseBackend, DatabaseConfig};
use crate::redirect::{handlers::health_check, middleware::record_request_timing, routes::create_redirect_router};
use crate::storage::{CachedStorage, PostgresStorage, SqliteStorage, Storage};
use crate::web::create_web_router;

/// Open the configured backend and create its tables
pub async fn open_storage(database: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite storage: {}", database.url);
            Arc::new(SqliteStorage::new(&database.url, database.max_connections).await?)
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL storage: {}", database.url);
            Arc::new(PostgresStorage::new(&database.url, database.max_connections).await?)
        }
    };

    storage.init().await?;
    Ok(storage)
}

/// Put the read cache in front of `storage` unless it is disabled
pub fn with_cache(storage: Arc<dyn Storage>, cache: &CacheConfig) -> Arc<dyn Storage> {
    if cache.max_entries == 0 {
        info!("Link cache disabled");
        return storage;
    }

    info!(
        max_entries = cache.max_entries,
        ttl_secs = cache.ttl_secs,
        "Link cache enabled"
    );
    Arc::new(CachedStorage::new(storage, cache.max_entries, cache.ttl_secs))
}

/// The complete HTTP application: intake form, redirects, stats and health
pub fn create_app_router(storage: Arc<dyn Storage>, config: &Config) -> Router {
    let redirect_status =
        StatusCode::from_u16(config.server.redirect_status).unwrap_or(StatusCode::FOUND);

    Router::new()
        .route("/health", get(health_check))
        .merge(create_web_router(
            Arc::clone(&storage),
            config.links.clone(),
        ))
        .merge(create_redirect_router(
            storage,
            config.client_address.clone(),
            redirect_status,
        ))
        .layer(middleware::from_fn(record_request_timing))
        .layer(TraceLayer::new_for_http())
}
