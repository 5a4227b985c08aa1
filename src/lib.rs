//! Load balancer pool monitor library.
//!
//! Polls a management API for pool member state, reports state changes and
//! serves the latest snapshot to an interactive console.

pub mod config;
pub mod console;
pub mod lifecycle;
pub mod monitor;
pub mod observability;
pub mod snapshot;
pub mod upstream;

pub use config::schema::MonitorConfig;
pub use lifecycle::Shutdown;
pub use snapshot::{Snapshot, SnapshotStore};
