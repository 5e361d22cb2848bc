//! Cache-aside decorator for query handlers.

use super::CacheInterface;
use async_trait::async_trait;
use metrics::counter;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use workforce_core::messaging::{until_cancelled, CancellationToken, Query, QueryHandler};
use workforce_core::{WorkforceError, WorkforceResult};

/// Cache lookups by outcome (`hit`, `miss`, `corrupt`, `error`).
pub const CACHE_LOOKUPS_TOTAL: &str = "workforce_cache_lookups_total";

/// A query whose result can be cached under a key derived from its input.
pub trait CacheableQuery: Query {
    /// Deterministic key for this query's result.
    fn cache_key(&self) -> String;
}

/// Wraps a query handler with a read-through cache.
///
/// A hit is returned without calling the inner handler. Misses, blank
/// values, undecodable values and cache read failures all fall through to
/// the inner handler. Found results are written back; `None` never is.
/// Concurrent misses for the same key may both reach the inner handler.
pub struct CacheAside<H> {
    inner: H,
    cache: Arc<dyn CacheInterface>,
    ttl: Option<Duration>,
}

impl<H> CacheAside<H> {
    #[must_use]
    pub fn new(inner: H, cache: Arc<dyn CacheInterface>, ttl: Option<Duration>) -> Self {
        Self { inner, cache, ttl }
    }

    async fn lookup<R: DeserializeOwned>(
        &self,
        request: &'static str,
        key: &str,
        cancel: &CancellationToken,
    ) -> WorkforceResult<Option<R>> {
        let raw = match until_cancelled(cancel, self.cache.get(key)).await {
            Ok(raw) => raw,
            Err(WorkforceError::Cancelled) => return Err(WorkforceError::Cancelled),
            Err(e) => {
                warn!(request, key, error = %e, "Cache read failed, querying the repository");
                counter!(CACHE_LOOKUPS_TOTAL, "request" => request, "outcome" => "error").increment(1);
                return Ok(None);
            }
        };

        let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
            counter!(CACHE_LOOKUPS_TOTAL, "request" => request, "outcome" => "miss").increment(1);
            return Ok(None);
        };

        match serde_json::from_str::<R>(&raw) {
            Ok(value) => {
                counter!(CACHE_LOOKUPS_TOTAL, "request" => request, "outcome" => "hit").increment(1);
                debug!(request, key, "Cache hit");
                Ok(Some(value))
            }
            Err(e) => {
                warn!(request, key, error = %e, "Corrupted cache entry, querying the repository");
                counter!(CACHE_LOOKUPS_TOTAL, "request" => request, "outcome" => "corrupt").increment(1);
                Ok(None)
            }
        }
    }

    async fn store<R: Serialize + Sync>(
        &self,
        request: &'static str,
        key: &str,
        value: &R,
        cancel: &CancellationToken,
    ) -> WorkforceResult<()> {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(request, key, error = %e, "Result not cacheable");
                return Ok(());
            }
        };

        match until_cancelled(cancel, self.cache.set(key, &json, self.ttl)).await {
            Err(WorkforceError::Cancelled) => Err(WorkforceError::Cancelled),
            Err(e) => {
                warn!(request, key, error = %e, "Cache write failed");
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }
}

#[async_trait]
impl<Q, R, H> QueryHandler<Q, R> for CacheAside<H>
where
    Q: CacheableQuery,
    R: Serialize + DeserializeOwned + Send + Sync + 'static,
    H: QueryHandler<Q, R>,
{
    async fn handle(&self, query: Q, cancel: &CancellationToken) -> WorkforceResult<Option<R>> {
        let key = query.cache_key();

        if let Some(cached) = self.lookup::<R>(Q::NAME, &key, cancel).await? {
            return Ok(Some(cached));
        }

        let Some(result) = self.inner.handle(query, cancel).await? else {
            debug!(request = Q::NAME, key, "No result, nothing cached");
            return Ok(None);
        };

        self.store(Q::NAME, &key, &result, cancel).await?;
        Ok(Some(result))
    }
}
