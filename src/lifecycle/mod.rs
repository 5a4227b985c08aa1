//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config (validated in main) → Metrics → Authenticate → Spawn poller → Console
//!
//! Shutdown (shutdown.rs):
//!     quit / exit / EOF / Ctrl-C → Raise stop flag → Poller finishes cycle → Exit
//!
//! Signals (signals.rs):
//!     SIGINT → End the console, which runs the shutdown path
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then auth, then background work
//! - Shutdown has a grace period: the process exits after the deadline

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, StopSignal};
