//! Snapshot subsystem.
//!
//! # Data Flow
//! ```text
//! Poller fetch results
//!     → tracker.rs (diff by pool/member key, record new states)
//!     → TransitionEvent list
//!     → store.rs (publish immutable Snapshot by Arc swap)
//!     → console reads current() once per view
//! ```
//!
//! # Design Decisions
//! - Snapshot is never mutated after publish
//! - The previous-state map is private to the poller
//! - No history beyond the previous state per key

pub mod store;
pub mod tracker;

pub use store::{Snapshot, SnapshotStore};
pub use tracker::{StateTracker, TransitionEvent};
