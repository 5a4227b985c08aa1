//! Startup orchestration.
//!
//! # Responsibilities
//! - Authenticate against the management API
//! - Start the metrics exporter and the poller
//! - Run the console in the foreground
//! - Stop the poller and wait for it, within a grace period
//!
//! # Design Decisions
//! - Fail fast: authentication failure is fatal
//! - Poll cycle failures are never fatal
//! - Shutdown is cooperative; a stuck poller is left behind after the grace period

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::config::{ConfigError, MonitorConfig};
use crate::console::{Console, ExitReason};
use crate::lifecycle::{signals, Shutdown};
use crate::monitor::{PollStats, Poller};
use crate::observability::metrics;
use crate::snapshot::SnapshotStore;
use crate::upstream::{AuthError, ManagementClient, StateSource};

/// Conditions that end the process before or instead of a normal session.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("console I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Authenticate and run an interactive session on stdin/stdout.
pub async fn run(config: MonitorConfig) -> Result<ExitReason, StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    if config.upstream.accept_invalid_certs {
        tracing::warn!(host = %config.upstream.host, "Certificate verification disabled for management host");
    }

    let client = Arc::new(ManagementClient::connect(&config.upstream).await?);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let reason = run_session(client, &config, stdin, &mut stdout, signals::interrupt()).await?;
    Ok(reason)
}

/// Wire store, poller and console around an authenticated source and run
/// until the console exits.
pub async fn run_session<S, R, W, I>(
    source: Arc<S>,
    config: &MonitorConfig,
    input: R,
    output: &mut W,
    interrupt: I,
) -> io::Result<ExitReason>
where
    S: StateSource,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    I: Future<Output = ()>,
{
    let store = Arc::new(SnapshotStore::new());
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();

    let poller = Poller::new(source.clone(), store.clone(), events_tx, &config.poller);
    let poller_handle = tokio::spawn(poller.run(shutdown.subscribe()));

    let mut console = Console::new(
        config.upstream.host.clone(),
        source,
        store,
        events_rx,
        &config.console,
    );
    let result = console.run(input, output, interrupt).await;

    // Stop the poller whatever way the console ended, I/O errors included.
    shutdown.trigger();
    let grace = Duration::from_secs(config.console.shutdown_grace_secs);
    stop_poller(poller_handle, grace).await;

    result
}

async fn stop_poller(mut handle: JoinHandle<PollStats>, grace: Duration) -> Option<PollStats> {
    tracing::debug!(grace_secs = grace.as_secs(), "Waiting for poller to finish its cycle");
    match timeout(grace, &mut handle).await {
        Ok(Ok(stats)) => Some(stats),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Poller task failed");
            None
        }
        Err(_) => {
            tracing::warn!(grace_secs = grace.as_secs(), "Poller did not stop within grace period");
            None
        }
    }
}
