//! Shop Cache - JSON cache helper and API server
//!
//! Serves the cache helper over HTTP and owns the store client lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shop_cache::api::create_router;
use shop_cache::{spawn_cleanup_task, AppState, CacheBackend, CacheHelper, Config, MemoryStore};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Load `.env` if present, then initialize tracing
/// 2. Load configuration from environment variables
/// 3. Build the backing store and cache helper
/// 4. Start the expiry sweep (memory backend only)
/// 5. Serve HTTP until SIGINT/SIGTERM
/// 6. Close the store client
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shop_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shop Cache Server");
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, redis={}, default_ttl={}s, port={}",
        config.backend,
        config.redis_url(),
        config.default_ttl,
        config.server_port
    );

    let (cache, sweep_handle) = match config.backend {
        CacheBackend::Memory => {
            let store = Arc::new(MemoryStore::new());
            let handle = spawn_cleanup_task(store.clone(), config.cleanup_interval);
            (CacheHelper::new(store, config.default_ttl_duration()), Some(handle))
        }
        CacheBackend::Redis => (
            CacheHelper::from_config(&config).context("invalid Redis configuration")?,
            None,
        ),
    };

    if let Err(err) = cache.ping().await {
        warn!(error = %err, "Backing store not reachable yet; cache calls will fail until it is");
    }

    let state = AppState::new(cache);
    let app = create_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("server error")?;

    state.cache.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweep task.
async fn shutdown_signal(sweep_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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

    if let Some(handle) = sweep_handle {
        handle.abort();
        warn!("Expiry sweep aborted");
    }
}
