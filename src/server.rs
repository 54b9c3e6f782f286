//! HTTP server initialization and runtime setup.
//!
//! Handles event store setup, click queue startup, the Axum server lifecycle
//! and the orderly shutdown that drains pending clicks.

use crate::config::Config;
use crate::domain::repositories::EventStore;
use crate::infrastructure::persistence::{InMemoryEventStore, RedisEventStore};
use crate::infrastructure::queue::EventQueue;
use crate::infrastructure::registry::UrlRegistry;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Event store (Redis, or in-memory fallback)
/// - Click queue with its consumer pool
/// - Axum HTTP server
///
/// On Ctrl-C / SIGTERM the server stops accepting connections, then the click
/// queue stops accepting events and drains before returning.
///
/// # Errors
///
/// Returns an error if:
/// - `BASE_URL` is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = connect_event_store(&config).await;
    let registry = Arc::new(UrlRegistry::new());

    let queue = Arc::new(EventQueue::start(store.clone(), config.queue_config()));
    tracing::info!("Click queue started");

    let state = AppState::new(
        registry,
        store,
        queue.clone(),
        config.parsed_base_url()?,
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    queue.shutdown().await;

    Ok(())
}

async fn connect_event_store(config: &Config) -> Arc<dyn EventStore> {
    if let Some(redis_url) = &config.redis_url {
        match RedisEventStore::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Event store: Redis");
                return Arc::new(redis);
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using in-memory store.", e);
            }
        }
    } else {
        tracing::info!("Event store: in-memory");
    }

    Arc::new(InMemoryEventStore::new())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
