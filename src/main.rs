//! Load balancer pool monitor.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌────────────────────────── pool-monitor ──────────────────────────┐
//!   │                                                                   │
//!   │  ┌──────────┐  fetch  ┌──────────┐ publish ┌───────────────┐      │
//!   │  │ upstream │◀────────│ monitor  │────────▶│   snapshot    │      │
//!   │  │  client  │         │  poller  │         │ store (Arc    │      │
//!   │  └────┬─────┘         └────┬─────┘         │  swap)        │      │
//!   │       │                    │ events        └───────┬───────┘      │
//!   │       │ on-demand          ▼                       │ current()    │
//!   │       │ virtuals     ┌──────────┐                  │              │
//!   │       └─────────────▶│ console  │◀─────────────────┘              │
//!   │                      │  repl    │◀──── stdin                      │
//!   │                      └──────────┘────▶ stdout                     │
//!   │                                                                   │
//!   │   config · observability (stderr logs, metrics) · lifecycle       │
//!   └───────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use pool_monitor::config::loader::{finalize, load_config};
use pool_monitor::config::{ConfigError, MonitorConfig};
use pool_monitor::lifecycle::startup;
use pool_monitor::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "pool-monitor")]
#[command(about = "Watch load balancer pool members and explore their state interactively", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Management host, overrides config and environment.
    #[arg(long)]
    host: Option<String>,

    /// Login user, overrides config and environment.
    #[arg(short, long)]
    username: Option<String>,

    /// Seconds between polls.
    #[arg(short, long)]
    interval: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut MonitorConfig) {
        if let Some(host) = self.host {
            config.upstream.host = host;
        }
        if let Some(username) = self.username {
            config.upstream.username = username;
        }
        if let Some(interval) = self.interval {
            config.poller.interval_secs = interval;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}

fn build_config(cli: Cli) -> Result<MonitorConfig, ConfigError> {
    let mut config = load_config(cli.config.as_deref())?;
    cli.apply(&mut config);
    finalize(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pool-monitor: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("pool-monitor: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        host = %config.upstream.host,
        interval_secs = config.poller.interval_secs,
        timeout_secs = config.upstream.timeout_secs,
        "pool-monitor v0.1.0 starting"
    );

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("pool-monitor: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(startup::run(config));

    // A pending stdin read cannot be cancelled; do not wait for it.
    runtime.shutdown_timeout(Duration::from_millis(200));

    match result {
        Ok(reason) => {
            tracing::info!(?reason, "Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Exiting");
            eprintln!("pool-monitor: {}", e);
            ExitCode::FAILURE
        }
    }
}
