//! HTTP server startup logic.

use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{AppConfig, SHUTDOWN_GRACE_SECS};

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bind the configured address and serve `app` until a shutdown signal.
///
/// This function blocks until the server shuts down. A bind failure is
/// returned immediately.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    serve(listener, app).await
}

/// Serve on an already-bound listener.
async fn serve(listener: TcpListener, app: Router) -> Result<(), ServerError> {
    let local_addr = listener.local_addr().map_err(ServerError::Serve)?;
    tracing::info!(addr = %local_addr, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal(Duration::from_secs(
            SHUTDOWN_GRACE_SECS,
        )))
        .await
        .map_err(ServerError::Serve)
}
