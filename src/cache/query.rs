//! Typed, single-flight memoization over a `CacheManager`.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::cache::{CacheError, CacheManager};
use crate::error::{AppError, AppResult};

/// Memoizes computations by key with at most one computation in flight per
/// key.
///
/// Concurrent callers for a key that is being computed wait for the first
/// caller, then read its result from the cache. When the first computation
/// fails nothing is stored and the next waiter computes. Different keys
/// never wait on each other.
///
/// Storage failures are logged and treated as misses; they never fail the
/// caller.
#[derive(Clone)]
pub struct QueryCache {
    store: CacheManager,
    in_flight: Arc<DashMap<String, Arc<Semaphore>>>,
}

impl QueryCache {
    pub fn new(store: CacheManager) -> Self {
        Self {
            store,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    pub async fn get_or_compute<T, F, Fut>(&self, key: &str, compute: F) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if !self.store.is_enabled() {
            return compute().await;
        }

        if let Some(value) = self.lookup(key).await {
            tracing::debug!(key = %key, "Query cache hit");
            return Ok(value);
        }

        let _flight = self.join_flight(key).await?;

        // Another caller may have filled the entry while we waited
        if let Some(value) = self.lookup(key).await {
            tracing::debug!(key = %key, "Query cache hit after waiting for in-flight computation");
            return Ok(value);
        }

        tracing::debug!(key = %key, "Query cache miss");
        let value = compute().await?;
        self.store_value(key, &value).await;
        Ok(value)
    }

    async fn join_flight(&self, key: &str) -> AppResult<FlightGuard> {
        let semaphore = self
            .in_flight
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(1)))
            .clone();

        if semaphore.available_permits() == 0 {
            tracing::debug!(key = %key, "Waiting for in-flight computation");
        }

        let permit = semaphore
            .acquire_owned()
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })?;

        Ok(FlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            key: key.to_string(),
            permit: Some(permit),
        })
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.store.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Query cache read failed, computing instead");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                let e = CacheError::Serialization(e.to_string());
                tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    async fn store_value<T: Serialize>(&self, key: &str, value: &T) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Query result is not serializable, not caching");
                return;
            }
        };

        if let Err(e) = self.store.set(key, bytes).await {
            tracing::warn!(key = %key, error = %e, "Query cache write failed");
        }
    }

    #[cfg(test)]
    fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }
}

/// Holds the per-key permit. Releasing it (also on cancellation) drops the
/// table entry once no other caller references it.
struct FlightGuard {
    in_flight: Arc<DashMap<String, Arc<Semaphore>>>,
    key: String,
    permit: Option<OwnedSemaphorePermit>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        drop(self.permit.take());
        // Waiters hold their own clone, so a count of 1 means only the table
        // still references the semaphore
        self.in_flight
            .remove_if(&self.key, |_, semaphore| Arc::strong_count(semaphore) == 1);
    }
}
