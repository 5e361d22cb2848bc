//! Query-result caching.
//!
//! Values are JSON strings so any backend can hold any result type. The
//! [`CacheAside`] decorator adds caching to a query handler without the
//! handler knowing about it.

mod cache_aside;
mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod redis_cache;

pub use cache_aside::{CacheAside, CacheableQuery};
pub use cache_interface::CacheInterface;
#[cfg(test)]
pub use cache_interface::MockCacheInterface;
pub use memory_cache::InMemoryCache;
pub use redis_cache::{create_redis_pool, RedisCacheService};
