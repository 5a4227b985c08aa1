//! Poll loop: fetch, diff, publish, notify, sleep.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::config::PollerConfig;
use crate::lifecycle::StopSignal;
use crate::observability::metrics;
use crate::snapshot::{Snapshot, SnapshotStore, StateTracker, TransitionEvent};
use crate::upstream::StateSource;

/// Result of a single poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new snapshot was published.
    Published { members: usize, transitions: usize },
    /// The member fetch failed; nothing was published or recorded.
    Failed,
}

/// Counters returned when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub cycles: u64,
    pub failed: u64,
    pub transitions: u64,
}

/// Background poller. The only writer of the snapshot store.
pub struct Poller<S: StateSource> {
    source: Arc<S>,
    store: Arc<SnapshotStore>,
    tracker: StateTracker,
    events: mpsc::UnboundedSender<TransitionEvent>,
    interval: Duration,
}

impl<S: StateSource> Poller<S> {
    pub fn new(
        source: Arc<S>,
        store: Arc<SnapshotStore>,
        events: mpsc::UnboundedSender<TransitionEvent>,
        config: &PollerConfig,
    ) -> Self {
        Self {
            source,
            store,
            tracker: StateTracker::new(),
            events,
            interval: Duration::from_secs(config.interval_secs),
        }
    }

    /// Override the sleep between cycles.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run until the stop flag is raised.
    pub async fn run(mut self, mut stop: StopSignal) -> PollStats {
        tracing::info!(interval_secs = self.interval.as_secs(), "Poller starting");
        let mut stats = PollStats::default();

        loop {
            if stop.is_stopped() {
                break;
            }

            stats.cycles += 1;
            match self.poll_once().await {
                CycleOutcome::Published { transitions, .. } => {
                    stats.transitions += transitions as u64;
                }
                CycleOutcome::Failed => stats.failed += 1,
            }

            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = stop.stopped() => {}
            }
        }

        tracing::info!(
            cycles = stats.cycles,
            failed = stats.failed,
            transitions = stats.transitions,
            "Poller stopped"
        );
        stats
    }

    /// Execute one fetch/diff/publish/notify cycle.
    pub async fn poll_once(&mut self) -> CycleOutcome {
        let (logs, members) = tokio::join!(
            self.source.fetch_logs(),
            self.source.fetch_pool_members()
        );

        let members = match members {
            Ok(members) => members,
            Err(err) => {
                metrics::record_fetch_failure(err.resource());
                tracing::error!(
                    resource = %err.resource(),
                    error = %err,
                    "Poll cycle failed, keeping previous snapshot"
                );
                metrics::record_cycle("failed");
                return CycleOutcome::Failed;
            }
        };

        // Missing logs only cost this cycle its log data; members still count.
        let logs = logs.unwrap_or_else(|err| {
            metrics::record_fetch_failure(err.resource());
            tracing::warn!(
                resource = %err.resource(),
                error = %err,
                "Publishing snapshot without log entries"
            );
            Vec::new()
        });

        let now = Local::now();
        let transitions = self.tracker.observe(&members, now);
        let snapshot = Snapshot::new(members, logs, now);
        let member_count = snapshot.members.len();

        metrics::record_snapshot(&snapshot);
        self.store.publish(snapshot);

        metrics::record_transitions(transitions.len());
        let transition_count = transitions.len();
        for event in transitions {
            tracing::warn!(
                key = %event.key,
                from = %event.previous,
                to = %event.current,
                "Pool member state changed"
            );
            // The console may already be gone during shutdown.
            let _ = self.events.send(event);
        }

        metrics::record_cycle("published");
        tracing::debug!(members = member_count, transitions = transition_count, "Snapshot published");

        CycleOutcome::Published {
            members: member_count,
            transitions: transition_count,
        }
    }

    /// Number of member keys with a recorded state.
    pub fn tracked_keys(&self) -> usize {
        self.tracker.len()
    }
}
