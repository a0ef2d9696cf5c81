//! SalesDash report server.
//!
//! Serves the rendered report over HTTP. Every page request runs the full
//! page sequence again; the dataset itself is read once and kept in the
//! controller's cache until `POST /api/cache/reset`.
//!
//! # Routes
//!
//! - `GET /` - rendered HTML page
//! - `GET /api/report` - report blocks as JSON
//! - `POST /api/cache/reset` - forget the cached dataset
//! - `GET /health` - health check

pub mod error;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use salesdash_core::PageController;

pub use error::{ServerError, ServerResult};
pub use routes::{AppState, create_router};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

impl ServerConfig {
    /// Socket address to bind.
    pub fn addr(&self) -> ServerResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}

/// Serve the report until Ctrl+C.
pub async fn serve(controller: PageController, config: ServerConfig) -> ServerResult<()> {
    let addr = config.addr()?;

    let state = Arc::new(AppState::new(controller));
    let app = create_router(state);

    tracing::info!("Starting SalesDash server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Create shutdown signal channel
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    // Handle Ctrl+C for graceful shutdown
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
