//! Swift-Cart catalog service binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swift_cart::cache::{Cache, MemoryCache, RedisCache};
use swift_cart::images::{CloudinaryHost, ImageHost, UnconfiguredImageHost};
use swift_cart::store::InMemoryStore;
use swift_cart::{create_router, spawn_cleanup_task, AppState, Config};

/// Main entry point for the catalog service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the cache (Redis, or the in-process cache with its cleanup task)
/// 4. Build the store and image host, wire them into the app state
/// 5. Serve HTTP until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to info for this crate, override with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swift_cart=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Swift-Cart catalog service");

    let config = Config::from_env();
    info!(
        port = config.server_port,
        cache_ttl = config.cache_ttl,
        policy = ?config.cache_failure_policy,
        "Configuration loaded"
    );

    let mut cleanup_handle = None;
    let mut memory_cache = None;
    let cache: Arc<dyn Cache> = match &config.redis_url {
        Some(url) => {
            let redis = RedisCache::connect(url)
                .await
                .context("failed to connect to Redis")?;
            info!("Using Redis cache");
            Arc::new(redis)
        }
        None => {
            let memory = MemoryCache::new(config.max_entries);
            cleanup_handle = Some(spawn_cleanup_task(memory.clone(), config.cleanup_interval));
            info!(max_entries = config.max_entries, "Using in-process cache");
            memory_cache = Some(memory.clone());
            Arc::new(memory)
        }
    };

    let images: Arc<dyn ImageHost> = match config.cloudinary.clone() {
        Some(cloudinary) => Arc::new(CloudinaryHost::new(cloudinary)),
        None => {
            warn!("Image host not configured, category image uploads will fail");
            Arc::new(UnconfiguredImageHost)
        }
    };

    let store = Arc::new(InMemoryStore::new());
    let mut state = AppState::new(&config, cache, store, images);
    if let Some(memory) = memory_cache {
        state = state.with_memory_cache(memory);
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the cleanup task.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
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

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
