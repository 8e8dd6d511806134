//! Per-group submission locks.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = DashMap<String, Arc<Mutex<()>>>;

/// One async mutex per group name, created on first use and dropped once no
/// task holds or waits for it.
#[derive(Debug, Default)]
pub struct GroupLocks {
    locks: Arc<LockTable>,
}

impl GroupLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other holder has the group's lock and takes it.
    pub async fn acquire(&self, group: &str) -> GroupGuard {
        // The map guard must be dropped before awaiting.
        let lock = self
            .locks
            .entry(group.to_string())
            .or_default()
            .value()
            .clone();
        GroupGuard {
            guard: Some(lock.lock_owned().await),
            group: group.to_string(),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of groups with a lock currently held or awaited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns true if no group lock is held or awaited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Held group lock. Releasing the last handle removes the group's entry.
#[derive(Debug)]
pub struct GroupGuard {
    guard: Option<OwnedMutexGuard<()>>,
    group: String,
    locks: Arc<LockTable>,
}

impl Drop for GroupGuard {
    fn drop(&mut self) {
        self.guard.take();
        // Waiters clone the Arc under the shard lock, so a count of one means
        // the table holds the only reference.
        self.locks
            .remove_if(&self.group, |_, lock| Arc::strong_count(lock) == 1);
    }
}
