//! Token Gate - cached request authentication
//!
//! Serves the authenticated HTTP surface backed by the token cache.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use token_gate::api::create_router;
use token_gate::{start_background_cleanup, AppState, Config};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables (refuse to start without a secret)
/// 3. Build token codec, sharded cache and verification gate
/// 4. Start background cache cleanup task
/// 5. Serve HTTP until SIGINT/SIGTERM, then stop the cleanup task
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "token_gate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Token Gate");

    let config = Config::from_env().map_err(|err| {
        error!("Refusing to start: {}", err);
        err
    })?;
    info!(
        "Configuration loaded: shards={}, shard_capacity={}, cache_ttl={}s, token_lifetime={}s, cleanup_interval={}s, port={}",
        config.shard_count,
        config.shard_capacity,
        config.cache_ttl,
        config.token_lifetime,
        config.cleanup_interval,
        config.server_port
    );

    let state = AppState::from_config(&config)?;
    info!("Token cache initialized with capacity {}", state.cache().capacity());

    let shutdown = CancellationToken::new();
    let cleanup_handle = start_background_cleanup(
        state.cache().clone(),
        config.cleanup_interval(),
        shutdown.clone(),
    );

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("server error")?;

    cleanup_handle.await.context("cleanup task panicked")?;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then cancels background work.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", err);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    shutdown.cancel();
}
