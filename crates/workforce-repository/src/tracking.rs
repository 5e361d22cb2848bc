//! Staged changes and snapshots of tracked entities.

use parking_lot::Mutex;
use std::collections::HashMap;
use workforce_core::{Entity, Value};

/// A staged mutation.
#[derive(Debug, Clone)]
pub(crate) enum Change<T> {
    Add(T),
    Update(T),
    Delete(T),
}

impl<T: Entity> Change<T> {
    pub(crate) fn entity(&self) -> &T {
        match self {
            Self::Add(e) | Self::Update(e) | Self::Delete(e) => e,
        }
    }
}

type Snapshot<T> = Vec<(<T as Entity>::Field, Value)>;

/// Per-scope bookkeeping shared by every repository implementation.
pub(crate) struct ChangeTracker<T: Entity> {
    pending: Mutex<Vec<Change<T>>>,
    snapshots: Mutex<HashMap<String, Snapshot<T>>>,
}

impl<T: Entity> ChangeTracker<T> {
    pub(crate) fn new() -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
            snapshots: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn stage(&self, change: Change<T>) {
        self.pending.lock().push(change);
    }

    /// Records the loaded state of entities read in tracking mode.
    pub(crate) fn track(&self, entities: &[T]) {
        let mut snapshots = self.snapshots.lock();
        for entity in entities {
            snapshots.insert(entity.id().to_string(), entity.values());
        }
    }

    pub(crate) fn tracked_count(&self) -> usize {
        self.snapshots.lock().len()
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self.pending.lock().is_empty()
    }

    pub(crate) fn discard(&self) {
        self.pending.lock().clear();
    }

    /// Takes the staged changes, dropping updates that match their snapshot.
    pub(crate) fn drain(&self) -> Vec<Change<T>> {
        let pending = std::mem::take(&mut *self.pending.lock());
        let snapshots = self.snapshots.lock();
        pending
            .into_iter()
            .filter(|change| match change {
                Change::Update(entity) => snapshots
                    .get(&entity.id().to_string())
                    .map_or(true, |snapshot| *snapshot != entity.values()),
                Change::Add(_) | Change::Delete(_) => true,
            })
            .collect()
    }

    /// Puts changes back in front of anything staged since the drain.
    pub(crate) fn restore(&self, mut changes: Vec<Change<T>>) {
        let mut pending = self.pending.lock();
        changes.append(&mut pending);
        *pending = changes;
    }

    /// Refreshes snapshots after a successful commit.
    pub(crate) fn committed(&self, changes: &[Change<T>]) {
        let mut snapshots = self.snapshots.lock();
        for change in changes {
            let key = change.entity().id().to_string();
            match change {
                Change::Add(entity) | Change::Update(entity) => {
                    snapshots.insert(key, entity.values());
                }
                Change::Delete(_) => {
                    snapshots.remove(&key);
                }
            }
        }
    }
}
