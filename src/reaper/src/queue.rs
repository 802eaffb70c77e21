//! Ordered store of pending deletions.
//!
//! Records live in a name-keyed map (the authoritative membership and
//! most-recent insertion instant) alongside a `VecDeque` holding insertion
//! order. `remove` and `requeue` only touch the map; deque entries whose
//! name is gone or whose instant disagrees with the map are stale and get
//! discarded lazily whenever the front is inspected. Under this
//! FIFO-with-requeue discipline the pruned front is always the next record
//! to mature.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tokio::time::Instant;

/// One file awaiting removal.
#[derive(Debug, Clone)]
pub(crate) struct PendingFile {
    pub name: String,
    pub inserted: Instant,
}

#[derive(Debug, Default)]
pub(crate) struct DeleteQueue {
    by_name: HashMap<String, Instant>,
    order: VecDeque<PendingFile>,
}

impl DeleteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Enqueue `name`, unless it is already pending.
    ///
    /// Returns `false` for the duplicate no-op.
    pub fn insert(&mut self, name: &str, now: Instant) -> bool {
        if self.by_name.contains_key(name) {
            return false;
        }
        self.by_name.insert(name.to_string(), now);
        self.order.push_back(PendingFile {
            name: name.to_string(),
            inserted: now,
        });
        true
    }

    /// Drop `name` from the pending set.
    ///
    /// The matching deque entry goes stale and is pruned later.
    pub fn remove(&mut self, name: &str) -> bool {
        self.by_name.remove(name).is_some()
    }

    /// Pop the front record if its grace period has elapsed.
    ///
    /// The map entry stays behind: the caller must follow up with either
    /// [`finish`](Self::finish) or [`requeue`](Self::requeue) before
    /// releasing the lock guarding this queue.
    pub fn pop_mature(&mut self, now: Instant, grace: Duration) -> Option<PendingFile> {
        self.prune_front();
        let front = self.order.front()?;
        if now.duration_since(front.inserted) < grace {
            return None;
        }
        self.order.pop_front()
    }

    /// Mark a popped record as done; it is no longer pending.
    pub fn finish(&mut self, name: &str) {
        self.by_name.remove(name);
    }

    /// Reschedule a popped record with a fresh timestamp at the back.
    pub fn requeue(&mut self, name: String, now: Instant) {
        self.by_name.insert(name.clone(), now);
        self.order.push_back(PendingFile {
            name,
            inserted: now,
        });
    }

    /// Time until the front record matures, clamped to zero when overdue.
    pub fn next_deadline(&mut self, now: Instant, grace: Duration) -> Option<Duration> {
        self.prune_front();
        let front = self.order.front()?;
        Some(grace.saturating_sub(now.duration_since(front.inserted)))
    }

    fn prune_front(&mut self) {
        while let Some(front) = self.order.front() {
            match self.by_name.get(&front.name) {
                Some(&inserted) if inserted == front.inserted => return,
                _ => {
                    self.order.pop_front();
                }
            }
        }
    }
}
