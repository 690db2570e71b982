use anyhow::Result;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use smartlink::app::{create_app_router, open_storage, with_cache};
use smartlink::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    info!("Initializing database...");
    let storage = open_storage(&config.database).await?;
    info!("Database initialized successfully");

    let storage = with_cache(storage, &config.cache);

    if let Some(ttl) = config.links.ttl_secs {
        info!("New links expire after {} seconds", ttl);
    }

    let app = create_app_router(storage, &config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);
    info!("   - Intake form at http://{}/", addr);
    info!("   - Redirects at http://{}/go/{{slug}}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
