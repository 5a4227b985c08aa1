//! Per-member state memory and transition detection.
//!
//! # State Transitions
//! ```text
//! key unseen            → record state, no event
//! key seen, same state  → record state, no event
//! key seen, new state   → record state, emit (old → new)
//! key absent this poll  → entry kept as is
//! ```

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Local};

use crate::upstream::{MemberState, PoolMember, StateKey};

/// A member's state changed between two consecutive polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEvent {
    pub key: StateKey,
    pub previous: MemberState,
    pub current: MemberState,
    pub at: DateTime<Local>,
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] STATE CHANGE: {} {} -> {}",
            self.at.format("%Y-%m-%d %H:%M:%S"),
            self.key,
            self.previous,
            self.current
        )
    }
}

/// Last known state per member, owned by the poller.
#[derive(Debug, Default)]
pub struct StateTracker {
    previous: HashMap<StateKey, MemberState>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_state_of(&self, key: &StateKey) -> Option<&MemberState> {
        self.previous.get(key)
    }

    pub fn record_state(&mut self, key: StateKey, state: MemberState) {
        self.previous.insert(key, state);
    }

    /// Number of keys ever seen, including ones that have since disappeared.
    pub fn len(&self) -> usize {
        self.previous.len()
    }

    /// Diff a fresh member list against recorded states and record the new ones.
    pub fn observe(&mut self, members: &[PoolMember], at: DateTime<Local>) -> Vec<TransitionEvent> {
        let mut events = Vec::new();
        for member in members {
            let key = member.key();
            if let Some(previous) = self.previous_state_of(&key) {
                if *previous != member.state {
                    events.push(TransitionEvent {
                        key: key.clone(),
                        previous: previous.clone(),
                        current: member.state.clone(),
                        at,
                    });
                }
            }
            self.record_state(key, member.state.clone());
        }
        events
    }
}
