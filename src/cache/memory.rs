//! Memory cache implementation using cached::TimedSizedCache.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use cached::{Cached, TimedSizedCache};

use crate::cache::{AppCache, CacheError};
use crate::config::settings::MemoryCacheConfig;

/// In-memory cache with size limit and TTL.
///
/// The lock is only held for the map operation itself, never across an await.
pub struct MemoryCache {
    store: Mutex<TimedSizedCache<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let store = TimedSizedCache::with_size_and_lifespan(
            config.max_size,
            Duration::from_secs(config.ttl_seconds),
        );
        Self {
            store: Mutex::new(store),
        }
    }
}

#[async_trait]
impl AppCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut store = self
            .store
            .lock()
            .map_err(|e| CacheError::Operation(e.to_string()))?;
        Ok(store.cache_get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let mut store = self
            .store
            .lock()
            .map_err(|e| CacheError::Operation(e.to_string()))?;
        store.cache_set(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(max_size: usize, ttl_seconds: u64) -> MemoryCache {
        MemoryCache::new(&MemoryCacheConfig {
            max_size,
            ttl_seconds,
        })
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = cache(10, 60);
        cache.set("products:10:0::asc", b"page".to_vec()).await.unwrap();

        let value = cache.get("products:10:0::asc").await.unwrap();
        assert_eq!(value.as_deref(), Some(&b"page"[..]));
        assert!(cache.get("product:1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_size_bound_evicts_oldest() {
        let cache = cache(2, 60);
        cache.set("a", vec![1]).await.unwrap();
        cache.set("b", vec![2]).await.unwrap();
        cache.set("c", vec![3]).await.unwrap();

        assert!(cache.get("a").await.unwrap().is_none());
        assert!(cache.get("c").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = cache(10, 1);
        cache.set("product:7", vec![7]).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(cache.get("product:7").await.unwrap().is_none());
    }
}
