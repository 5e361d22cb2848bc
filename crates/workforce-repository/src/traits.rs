//! Repository contracts.
//!
//! Reads go straight to the store. Writes only stage a change; nothing
//! reaches durable storage until [`UnitOfWork::commit`] runs. Store errors
//! are propagated to the caller as they occur, without retries.

use async_trait::async_trait;
use workforce_core::{Entity, Predicate, WorkforceResult};

/// Read side of a repository.
///
/// Query handlers only ever receive this view, so no mutation is reachable
/// from the query path.
#[async_trait]
pub trait ReadRepository<T: Entity>: Send + Sync {
    /// Every entity, ordered by identity.
    ///
    /// With `as_no_tracking == false` the returned entities are also
    /// snapshotted for change detection; both modes return the same rows.
    async fn find_all(&self, as_no_tracking: bool) -> WorkforceResult<Vec<T>>;

    /// The entity with the given identity, if any.
    async fn find_by_id(&self, id: &T::Id, as_no_tracking: bool) -> WorkforceResult<Option<T>>;

    /// Entities matching the predicate, ordered by identity.
    async fn find(&self, predicate: &Predicate<T::Field>, as_no_tracking: bool) -> WorkforceResult<Vec<T>>;
}

/// Full repository: reads plus staged writes.
pub trait Repository<T: Entity>: ReadRepository<T> {
    /// Stages an insert.
    fn add(&self, entity: T);

    /// Stages an update. Updates of tracked entities whose fields did not
    /// change are dropped at commit.
    fn update(&self, entity: T);

    /// Stages a delete.
    fn delete(&self, entity: T);
}

/// Flushes staged changes to durable storage.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Applies all staged changes atomically and returns the number of
    /// affected rows. On failure the staged changes are kept.
    async fn commit(&self) -> WorkforceResult<usize>;

    /// Drops all staged changes.
    fn discard(&self);

    /// True while changes are staged.
    fn has_pending_changes(&self) -> bool;
}

/// A repository whose staged changes are committed through itself.
pub trait RepositoryScope<T: Entity>: Repository<T> + UnitOfWork {}

impl<T: Entity, R: Repository<T> + UnitOfWork> RepositoryScope<T> for R {}

/// Opens a fresh scope per command so staged changes never leak between
/// concurrent requests.
pub trait RepositoryFactory<T: Entity>: Send + Sync {
    fn scope(&self) -> Box<dyn RepositoryScope<T>>;
}
