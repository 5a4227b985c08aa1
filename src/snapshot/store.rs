//! Published snapshot storage.
//!
//! One writer (the poller) replaces the whole snapshot; any number of readers
//! load it. Readers hold an `Arc` to an immutable value, so a view rendered
//! from one `current()` call is always internally consistent.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Local};

use crate::upstream::{LogEntry, PoolMember};

/// Point-in-time bundle of fetched state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Pool members in fetch order.
    pub members: Vec<PoolMember>,
    /// Raw system log records.
    pub logs: Vec<LogEntry>,
    /// When the data was fetched; `None` for the empty startup snapshot.
    pub captured_at: Option<DateTime<Local>>,
}

impl Snapshot {
    /// The "not yet available" snapshot visible before the first publish.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(members: Vec<PoolMember>, logs: Vec<LogEntry>, captured_at: DateTime<Local>) -> Self {
        Self {
            members,
            logs,
            captured_at: Some(captured_at),
        }
    }

    pub fn is_available(&self) -> bool {
        self.captured_at.is_some()
    }

    pub fn members_in<'a>(&'a self, pool: &'a str) -> impl Iterator<Item = &'a PoolMember> + 'a {
        self.members.iter().filter(move |m| m.pool == pool)
    }

    pub fn count_up(&self) -> usize {
        self.members.iter().filter(|m| m.state.is_up()).count()
    }

    pub fn count_down(&self) -> usize {
        self.members.iter().filter(|m| m.state.is_down()).count()
    }
}

/// Holder of the current snapshot.
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot::empty()),
        }
    }

    /// Atomically replace the visible snapshot.
    pub fn publish(&self, snapshot: Snapshot) {
        self.current.store(Arc::new(snapshot));
    }

    /// The latest published snapshot, or the empty one before the first publish.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
