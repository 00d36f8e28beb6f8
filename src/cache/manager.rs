//! Cache manager that dispatches to the configured backend.

use std::sync::Arc;

use crate::cache::memory::MemoryCache;
use crate::cache::noop::NoOpCache;
use crate::cache::{AppCache, CacheError};
use crate::config::settings::{CacheBackend, CacheConfig};

/// Handle to the configured cache backend. Cloning shares the backend.
#[derive(Clone)]
pub struct CacheManager {
    backend: Arc<dyn AppCache>,
    enabled: bool,
}

impl CacheManager {
    /// Create a cache manager for the given configuration.
    ///
    /// If caching is disabled, a NoOpCache is used.
    pub fn new(config: &CacheConfig) -> Self {
        let backend: Arc<dyn AppCache> = if !config.enabled {
            Arc::new(NoOpCache)
        } else {
            match config.backend {
                CacheBackend::Memory => Arc::new(MemoryCache::new(&config.memory)),
            }
        };

        Self {
            backend,
            enabled: config.enabled,
        }
    }

    /// Wrap an existing backend, treated as enabled.
    pub fn from_backend(backend: Arc<dyn AppCache>) -> Self {
        Self {
            backend,
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.backend.get(key).await
    }

    pub async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        self.backend.set(key, value).await
    }
}
