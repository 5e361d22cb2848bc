//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool, PoolConfig, Runtime};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use workforce_config::RedisConfig;
use workforce_core::{HealthCheck, HealthStatus, WorkforceError, WorkforceResult};

/// Creates a Redis connection pool.
///
/// # Errors
/// `Configuration` when the URL or pool settings are rejected.
pub fn create_redis_pool(config: &RedisConfig) -> WorkforceResult<Arc<Pool>> {
    let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
    redis_cfg.pool = Some(PoolConfig::new(config.pool_size as usize));
    let pool = redis_cfg
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| WorkforceError::Configuration(format!("Failed to create Redis pool: {e}")))?;
    info!(pool_size = config.pool_size, "Redis connection pool created");
    Ok(Arc::new(pool))
}

/// Redis-based cache service.
pub struct RedisCacheService {
    pool: Arc<Pool>,
    key_prefix: String,
}

impl RedisCacheService {
    /// Create a new Redis cache service; every key is stored under `key_prefix`.
    #[must_use]
    pub fn new(pool: Arc<Pool>, key_prefix: impl Into<String>) -> Self {
        Self {
            pool,
            key_prefix: key_prefix.into(),
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }

    async fn get_conn(&self) -> WorkforceResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| WorkforceError::Cache(format!("Failed to get Redis connection: {e}")))
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    async fn get(&self, key: &str) -> WorkforceResult<Option<String>> {
        let key = self.full_key(key);
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| WorkforceError::Cache(format!("Failed to get key '{key}': {e}")))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> WorkforceResult<()> {
        let key = self.full_key(key);
        let mut conn = self.get_conn().await?;

        match ttl {
            Some(ttl) => {
                let ttl_secs = ttl.as_secs().max(1);
                conn.set_ex::<_, _, ()>(&key, value, ttl_secs).await
            }
            None => conn.set::<_, _, ()>(&key, value).await,
        }
        .map_err(|e| WorkforceError::Cache(format!("Failed to set key '{key}': {e}")))?;

        debug!("Cached key '{}' (ttl: {:?})", key, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> WorkforceResult<bool> {
        let key = self.full_key(key);
        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(&key)
            .await
            .map_err(|e| WorkforceError::Cache(format!("Failed to delete key '{key}': {e}")))?;

        Ok(deleted > 0)
    }
}

#[async_trait]
impl HealthCheck for RedisCacheService {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        let mut conn = match self.get_conn().await {
            Ok(conn) => conn,
            Err(e) => return HealthStatus::Unhealthy(e.to_string()),
        };
        let pong: Result<String, _> = deadpool_redis::redis::cmd("PING").query_async(&mut conn).await;
        match pong {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(format!("Redis ping failed: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_namespaced() {
        let pool = create_redis_pool(&RedisConfig::default()).unwrap();
        let cache = RedisCacheService::new(pool, "workforce:");
        assert_eq!(cache.full_key("NationalIDNumber1"), "workforce:NationalIDNumber1");
    }

    #[test]
    fn test_empty_prefix_leaves_keys_untouched() {
        let pool = create_redis_pool(&RedisConfig::default()).unwrap();
        let cache = RedisCacheService::new(pool, "");
        assert_eq!(cache.full_key("NationalIDNumber1"), "NationalIDNumber1");
    }
}
