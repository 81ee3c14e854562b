//! HTTP front door.
//!
//! Provides two endpoints:
//! - `POST /analyze` - run an analysis, JSON in and out
//! - `GET /health` - liveness and provider key availability

mod handlers;
mod types;

use std::net::SocketAddr;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;

use handlers::{analyze_handler, health_handler};
pub use types::{AnalyzeBody, ErrorResponse, HealthResponse, ServerState};

/// Builds the router. Exposed separately so tests can serve it on an ephemeral port.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Serves on an already bound listener until the process receives Ctrl-C.
pub async fn serve(listener: tokio::net::TcpListener, state: ServerState) -> anyhow::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::warn!("Failed to listen for shutdown signal: {e}");
                std::future::pending::<()>().await;
            }
            log::info!("Shutting down");
        })
        .await
        .context("Server error")
}

/// Binds `addr` and serves until shutdown.
pub async fn start_server(addr: SocketAddr, state: ServerState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind server to {addr}"))?;

    log::info!("Listening on http://{addr}/");
    log::info!("  - Analyze: POST http://{addr}/analyze");
    log::info!("  - Health: GET http://{addr}/health");

    serve(listener, state).await
}
