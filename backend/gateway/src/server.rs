//! Gateway HTTP server.

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};
use clicktrack_config::ClickTrackConfig;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::click_api;
use crate::ledger::ClickLedger;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub ledger: ClickLedger,
    /// Form field holding the article code
    pub body_key: String,
}

impl GatewayState {
    pub fn new(ledger: ClickLedger, body_key: impl Into<String>) -> Self {
        Self {
            ledger,
            body_key: body_key.into(),
        }
    }

    pub fn from_config(config: &ClickTrackConfig, ledger: ClickLedger) -> Self {
        Self::new(ledger, config.tracking.body_key.clone())
    }
}

pub fn build_router(state: GatewayState, click_path: &str) -> Router {
    Router::new()
        .route(click_path, post(click_api::record_click))
        .route("/article/:code/", get(click_api::follow_article))
        .route("/api/articles", get(click_api::list_articles))
        .route("/api/health", get(|| async { "OK" }))
        .with_state(state)
}

/// Serve `app` on an already bound listener until ctrl-c.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Gateway HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Gateway stopped");
    Ok(())
}

/// Bind `addr` and serve the click routes.
pub async fn start_server(addr: SocketAddr, state: GatewayState, click_path: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind gateway to {addr}"))?;
    serve(listener, build_router(state, click_path)).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}
