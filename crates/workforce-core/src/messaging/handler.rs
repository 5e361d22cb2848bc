//! Request capability traits and handler contracts.

use crate::WorkforceResult;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// A read-only, side-effect-free request.
pub trait Query: Send + 'static {
    /// Name used in logs, metrics and dispatch errors.
    const NAME: &'static str;
}

/// A request that may mutate the data store.
pub trait Command: Send + 'static {
    /// Name used in logs, metrics and dispatch errors.
    const NAME: &'static str;
}

/// Handles one query type, producing an optional result.
///
/// `Ok(None)` means the query found nothing; it is not an error.
#[async_trait]
pub trait QueryHandler<Q, R>: Send + Sync
where
    Q: Query,
    R: Send + 'static,
{
    /// Handles the query.
    async fn handle(&self, query: Q, cancel: &CancellationToken) -> WorkforceResult<Option<R>>;
}

/// Handles one command type, producing an optional result.
#[async_trait]
pub trait CommandHandler<C, R>: Send + Sync
where
    C: Command,
    R: Send + 'static,
{
    /// Handles the command.
    async fn handle(&self, command: C, cancel: &CancellationToken) -> WorkforceResult<Option<R>>;
}
