//! Cache store contract.

use async_trait::async_trait;
use std::time::Duration;
use workforce_core::WorkforceResult;

/// A string key-value store with optional expiry.
///
/// Implementations synchronize internally; one instance is shared by every
/// concurrent request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheInterface: Send + Sync {
    /// The stored value, or `None` if absent or expired.
    async fn get(&self, key: &str) -> WorkforceResult<Option<String>>;

    /// Stores a value, overwriting any previous one. `ttl == None` keeps the
    /// entry until it is deleted.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> WorkforceResult<()>;

    /// Removes a value; returns `true` if the key existed.
    async fn delete(&self, key: &str) -> WorkforceResult<bool>;
}
