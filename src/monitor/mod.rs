//! Background monitoring subsystem.
//!
//! # Data Flow
//! ```text
//! Fixed interval timer
//!     → StateSource (logs + pool members, concurrently)
//!     → StateTracker::observe (transition events)
//!     → SnapshotStore::publish
//!     → event channel (console prints STATE CHANGE lines)
//!     → sleep, or exit if the stop flag is raised
//! ```
//!
//! # Design Decisions
//! - The stop flag is checked between cycles, never mid-fetch
//! - A failed member fetch publishes nothing and the loop carries on
//! - A failed log fetch publishes the members with an empty log list
//! - Virtual servers are fetched on demand by the console, not polled

pub mod poller;

pub use poller::{CycleOutcome, PollStats, Poller};
