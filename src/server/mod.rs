//! HTTP surface consumed by the presentation layer.
//!
//! Three routes mirror the upstream 1:1:
//!
//! | Route                       | Upstream                 | Error field |
//! |-----------------------------|--------------------------|-------------|
//! | `GET /api/check-connection` | `GET /check-connection`  | `message`   |
//! | `GET /api/my-plan`          | `GET /my-plan`           | `error`     |
//! | `POST /api/courier-check`   | `POST /courier-check`    | `error`     |

pub mod envelope;
pub mod handlers;

use crate::domain::ports::CourierApi;
use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn CourierApi>,
}

impl AppState {
    pub fn new<A: CourierApi + 'static>(api: A) -> Self {
        Self { api: Arc::new(api) }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/check-connection", get(handlers::check_connection))
        .route("/api/my-plan", get(handlers::my_plan))
        .route("/api/courier-check", post(handlers::courier_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `address` and serves until Ctrl+C or SIGTERM.
pub async fn serve(address: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!(address = %address, "🚀 Starting HTTP server on http://{}", address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = shutdown_signal().await {
                tracing::error!("Error while waiting for shutdown signal: {e}");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .context("HTTP server failed")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    Ok(())
}
