//! AppCache trait definition.

use async_trait::async_trait;

use crate::cache::CacheError;

/// Storage backend for serialized cache entries.
///
/// Expiry and eviction are the backend's concern; callers only read and
/// write whole entries.
#[async_trait]
pub trait AppCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError>;
}
