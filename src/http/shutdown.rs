//! Graceful shutdown and signal handling.

use std::time::Duration;

/// Resolves once SIGINT or SIGTERM is received.
///
/// After the signal the server stops accepting connections and waits for
/// in-flight requests. A watchdog exits the process if draining takes longer
/// than `grace`.
pub async fn shutdown_signal(grace: Duration) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }

    tracing::info!(
        grace_secs = grace.as_secs(),
        "Graceful shutdown initiated, waiting for connections to close"
    );

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        tracing::warn!("Connections still open after grace period, exiting");
        std::process::exit(1);
    });
}
