//! Process-local store evaluating predicates directly.

use crate::tracking::{Change, ChangeTracker};
use crate::{ReadRepository, Repository, RepositoryFactory, RepositoryScope, UnitOfWork};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use workforce_core::{Entity, Predicate, WorkforceError, WorkforceResult};

/// Shared rows of one entity type, keyed by identity.
pub struct InMemoryStore<T> {
    rows: Arc<RwLock<HashMap<String, T>>>,
}

impl<T> Clone for InMemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> InMemoryStore<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// A store pre-populated with rows.
    #[must_use]
    pub fn with_rows(rows: impl IntoIterator<Item = T>) -> Self {
        let map = rows.into_iter().map(|row| (row.id().to_string(), row)).collect();
        Self {
            rows: Arc::new(RwLock::new(map)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// A repository scope over this store.
    #[must_use]
    pub fn repository(&self) -> InMemoryRepository<T> {
        InMemoryRepository {
            store: self.clone(),
            tracker: ChangeTracker::new(),
        }
    }

    fn select(&self, predicate: &Predicate<T::Field>) -> Vec<T> {
        let mut rows: Vec<T> = self
            .rows
            .read()
            .values()
            .filter(|row| predicate.matches(*row))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.value_of(T::KEY)
                .compare(&b.value_of(T::KEY))
                .unwrap_or(Ordering::Equal)
        });
        rows
    }

    /// Applies changes all-or-nothing. Primary and unique keys are checked
    /// against the rows as they would stand after the whole batch.
    fn apply(&self, changes: &[Change<T>]) -> WorkforceResult<usize> {
        let mut rows = self.rows.write();
        let mut staged = rows.clone();
        let mut affected = 0;

        for change in changes {
            let key = change.entity().id().to_string();
            match change {
                Change::Add(entity) => {
                    if staged.contains_key(&key) {
                        return Err(duplicate_entry::<T>(&key, "PRIMARY"));
                    }
                    staged.insert(key, entity.clone());
                    affected += 1;
                }
                Change::Update(entity) => {
                    if let Some(row) = staged.get_mut(&key) {
                        *row = entity.clone();
                        affected += 1;
                    }
                }
                Change::Delete(_) => {
                    if staged.remove(&key).is_some() {
                        affected += 1;
                    }
                }
            }
        }

        for change in changes {
            if let Change::Add(entity) | Change::Update(entity) = change {
                if let Some(row) = staged.get(&entity.id().to_string()) {
                    check_unique(&staged, row)?;
                }
            }
        }

        *rows = staged;
        Ok(affected)
    }
}

fn duplicate_entry<T: Entity>(value: &str, index: &str) -> WorkforceError {
    WorkforceError::Database(format!("Duplicate entry '{value}' for key '{}.{index}'", T::NAME))
}

fn check_unique<T: Entity>(rows: &HashMap<String, T>, entity: &T) -> WorkforceResult<()> {
    let own_key = entity.id().to_string();
    for (index, field) in T::UNIQUE {
        let value = entity.value_of(*field);
        if value.is_null() {
            continue;
        }
        let clash = rows
            .iter()
            .any(|(key, row)| *key != own_key && row.value_of(*field) == value);
        if clash {
            return Err(duplicate_entry::<T>(&value.to_string(), index));
        }
    }
    Ok(())
}

impl<T: Entity> RepositoryFactory<T> for InMemoryStore<T> {
    fn scope(&self) -> Box<dyn RepositoryScope<T>> {
        Box::new(self.repository())
    }
}

/// Repository scope over an [`InMemoryStore`].
pub struct InMemoryRepository<T: Entity> {
    store: InMemoryStore<T>,
    tracker: ChangeTracker<T>,
}

impl<T: Entity> InMemoryRepository<T> {
    /// Number of entities snapshotted by tracked reads.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.tracker.tracked_count()
    }
}

#[async_trait]
impl<T: Entity> ReadRepository<T> for InMemoryRepository<T> {
    async fn find_all(&self, as_no_tracking: bool) -> WorkforceResult<Vec<T>> {
        self.find(&Predicate::True, as_no_tracking).await
    }

    async fn find_by_id(&self, id: &T::Id, as_no_tracking: bool) -> WorkforceResult<Option<T>> {
        let found = self.find(&Predicate::eq(T::KEY, id.clone()), as_no_tracking).await?;
        Ok(found.into_iter().next())
    }

    async fn find(&self, predicate: &Predicate<T::Field>, as_no_tracking: bool) -> WorkforceResult<Vec<T>> {
        let rows = self.store.select(predicate);
        debug!(entity = T::NAME, rows = rows.len(), "In-memory find");
        if !as_no_tracking {
            self.tracker.track(&rows);
        }
        Ok(rows)
    }
}

impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    fn add(&self, entity: T) {
        self.tracker.stage(Change::Add(entity));
    }

    fn update(&self, entity: T) {
        self.tracker.stage(Change::Update(entity));
    }

    fn delete(&self, entity: T) {
        self.tracker.stage(Change::Delete(entity));
    }
}

#[async_trait]
impl<T: Entity> UnitOfWork for InMemoryRepository<T> {
    async fn commit(&self) -> WorkforceResult<usize> {
        let changes = self.tracker.drain();
        if changes.is_empty() {
            return Ok(0);
        }
        match self.store.apply(&changes) {
            Ok(affected) => {
                self.tracker.committed(&changes);
                debug!(entity = T::NAME, affected, "In-memory commit");
                Ok(affected)
            }
            Err(e) => {
                self.tracker.restore(changes);
                Err(e)
            }
        }
    }

    fn discard(&self) {
        self.tracker.discard();
    }

    fn has_pending_changes(&self) -> bool {
        self.tracker.has_pending()
    }
}
