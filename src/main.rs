use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};
use worldsync::config::load_or_default;
use worldsync::host::ClientHub;
use worldsync::server::{create_router, run_dispatcher, WsAppState};
use worldsync::world::WorldSync;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worldsync=info".into()),
        )
        .init();

    info!("worldsync starting...");

    let config_path = std::env::var("WORLDSYNC_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("worldsync.toml"));
    let config = load_or_default(&config_path)?;

    let hub = Arc::new(ClientHub::new());
    let world = WorldSync::from_config(Arc::clone(&hub), &config);

    let (events_tx, events_rx) = mpsc::channel(config.server.channel_capacity.max(1));
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let dispatcher = tokio::spawn(run_dispatcher(
        world,
        events_rx,
        Duration::from_millis(config.tick.interval_ms),
        shutdown_rx,
    ));

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!(bind = %config.server.bind, "Listening for WebSocket clients on /ws");

    let app = create_router(Arc::new(WsAppState {
        hub,
        events: events_tx,
    }));
    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "Server error");
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown requested");

    let _ = shutdown_tx.send(());
    let world = dispatcher.await.context("Dispatcher task failed")?;

    // Registries are only destroyed here; persist them first
    if let Err(e) = world.save_all() {
        error!(error = %e, "Failed to save world state on shutdown");
    }

    server.abort();
    info!("worldsync stopped");
    Ok(())
}
