//! In-process cache.

use super::CacheInterface;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use workforce_core::{HealthCheck, HealthStatus, WorkforceResult};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Process-local cache guarded by a read-write lock.
#[derive(Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.read().values().filter(|e| e.is_live(now)).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if a live entry exists for the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .read()
            .get(key)
            .is_some_and(|e| e.is_live(Instant::now()))
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    async fn get(&self, key: &str) -> WorkforceResult<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|e| !e.is_live(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> WorkforceResult<()> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> WorkforceResult<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }
}

#[async_trait]
impl HealthCheck for InMemoryCache {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_overwrite_delete() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get("k").await.unwrap(), None);

        cache.set("k", "one", None).await.unwrap();
        cache.set("k", "two", None).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("two"));
        assert_eq!(cache.len(), 1);

        assert!(cache.delete("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_entries_without_ttl_do_not_expire() {
        let cache = InMemoryCache::new();
        cache.set("k", "v", None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(cache.contains_key("k"));
    }

    #[tokio::test]
    async fn test_ttl_expires_entry() {
        let cache = InMemoryCache::new();
        cache.set("k", "v", Some(Duration::from_millis(10))).await.unwrap();
        assert!(cache.contains_key("k"));

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!cache.contains_key("k"));
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert_eq!(cache.entries.read().len(), 0);
    }
}
