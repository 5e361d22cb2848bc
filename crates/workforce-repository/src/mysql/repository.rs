//! Generic MySQL repository.

use super::{sql, SqlEntity};
use crate::pool::DatabasePool;
use crate::tracking::{Change, ChangeTracker};
use crate::{ReadRepository, Repository, RepositoryFactory, RepositoryScope, UnitOfWork};
use async_trait::async_trait;
use sqlx::{MySql, QueryBuilder};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};
use workforce_core::{Predicate, WorkforceResult};

/// Repository scope backed by MySQL.
///
/// Reads run immediately against the pool; staged changes are flushed in one
/// transaction by [`UnitOfWork::commit`].
pub struct SqlRepository<T: SqlEntity> {
    pool: Arc<DatabasePool>,
    tracker: ChangeTracker<T>,
}

impl<T: SqlEntity> SqlRepository<T> {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self {
            pool,
            tracker: ChangeTracker::new(),
        }
    }

    fn log(&self, builder: &QueryBuilder<'_, MySql>) {
        if self.pool.log_queries() {
            info!(target: "sql", entity = T::NAME, "{}", builder.sql());
        }
    }

    async fn flush(&self, changes: &[Change<T>]) -> WorkforceResult<usize> {
        let mut tx = self.pool.inner().begin().await?;
        let mut affected = 0u64;
        for change in changes {
            let mut builder = match change {
                Change::Add(entity) => sql::insert(entity),
                Change::Update(entity) => sql::update(entity),
                Change::Delete(entity) => sql::delete(entity),
            };
            self.log(&builder);
            affected += builder.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;
        Ok(usize::try_from(affected).unwrap_or(usize::MAX))
    }
}

#[async_trait]
impl<T: SqlEntity> ReadRepository<T> for SqlRepository<T> {
    async fn find_all(&self, as_no_tracking: bool) -> WorkforceResult<Vec<T>> {
        self.find(&Predicate::True, as_no_tracking).await
    }

    async fn find_by_id(&self, id: &T::Id, as_no_tracking: bool) -> WorkforceResult<Option<T>> {
        let found = self.find(&Predicate::eq(T::KEY, id.clone()), as_no_tracking).await?;
        Ok(found.into_iter().next())
    }

    async fn find(&self, predicate: &Predicate<T::Field>, as_no_tracking: bool) -> WorkforceResult<Vec<T>> {
        let mut builder = sql::select::<T>(predicate);
        self.log(&builder);

        let rows = builder
            .build_query_as::<T::Row>()
            .fetch_all(self.pool.inner())
            .await?;
        let entities = rows.into_iter().map(T::from_row).collect::<WorkforceResult<Vec<_>>>()?;

        debug!(entity = T::NAME, rows = entities.len(), "MySQL find");
        if !as_no_tracking {
            self.tracker.track(&entities);
        }
        Ok(entities)
    }
}

impl<T: SqlEntity> Repository<T> for SqlRepository<T> {
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
impl<T: SqlEntity> UnitOfWork for SqlRepository<T> {
    async fn commit(&self) -> WorkforceResult<usize> {
        let changes = self.tracker.drain();
        if changes.is_empty() {
            return Ok(0);
        }
        match self.flush(&changes).await {
            Ok(affected) => {
                self.tracker.committed(&changes);
                debug!(entity = T::NAME, affected, "MySQL commit");
                Ok(affected)
            }
            Err(e) => {
                warn!(entity = T::NAME, error = %e, "Commit rolled back");
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

/// Hands out one [`SqlRepository`] per unit of work.
pub struct SqlRepositoryFactory<T> {
    pool: Arc<DatabasePool>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: SqlEntity> SqlRepositoryFactory<T> {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

impl<T: SqlEntity> RepositoryFactory<T> for SqlRepositoryFactory<T> {
    fn scope(&self) -> Box<dyn RepositoryScope<T>> {
        Box::new(SqlRepository::<T>::new(Arc::clone(&self.pool)))
    }
}
