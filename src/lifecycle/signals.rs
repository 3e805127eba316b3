//! OS signal handling.

/// Resolve when Ctrl+C is received.
///
/// If the handler cannot be installed this never resolves, leaving shutdown
/// to the broadcast coordinator.
pub async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
