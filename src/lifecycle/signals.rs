//! OS signal handling.
//!
//! # Responsibilities
//! - Translate Ctrl-C (SIGINT) into a console exit
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - The signal only ends the console; the console then runs the normal
//!   shutdown path so the poller finishes its cycle

/// Resolve on Ctrl-C. Never resolves if the handler cannot be installed.
pub async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::debug!("Interrupt received");
}
