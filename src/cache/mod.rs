//! Catalog query caching.
//!
//! - `AppCache` is the byte-level storage seam (memory or no-op backend).
//! - `CacheManager` picks the backend from configuration.
//! - `QueryCache` layers typed, single-flight memoization on top.
//!
//! ```toml
//! [cache]
//! enabled = true
//! backend = "memory"
//!
//! [cache.memory]
//! max_size = 1000
//! ttl_seconds = 300
//! ```

mod error;
mod manager;
mod memory;
mod noop;
mod query;
mod traits;

pub use error::CacheError;
pub use manager::CacheManager;
pub use memory::MemoryCache;
pub use noop::NoOpCache;
pub use query::QueryCache;
pub use traits::AppCache;
