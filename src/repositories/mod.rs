//! Repository layer for per-user state.
//!
//! Each store is a trait with a PostgreSQL implementation and an in-memory
//! implementation; the backend is picked from `storage.backend`.

mod cart_repo;
mod favorite_repo;
mod memory;

pub use cart_repo::CartRepository;
pub use favorite_repo::FavoriteRepository;
pub use memory::{MemoryCartStore, MemoryFavoriteStore};

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{CartLine, NewCartItem};

/// Per-user set of favorited product ids.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Records the pair. Fails with `AlreadyFavorited` when it exists.
    async fn add(&self, user_id: i64, product_id: i64) -> AppResult<()>;

    /// Deletes the pair. Fails with `NotFavorited` when it is absent.
    async fn remove(&self, user_id: i64, product_id: i64) -> AppResult<()>;

    /// Product ids in the order they were favorited.
    async fn list_product_ids(&self, user_id: i64) -> AppResult<Vec<i64>>;

    async fn contains(&self, user_id: i64, product_id: i64) -> AppResult<bool>;
}

/// Per-user cart lines.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Creates the line, or adds `item.quantity` to the existing line for the
    /// same pair without touching its snapshot. Atomic per pair.
    async fn add_or_merge(&self, item: NewCartItem) -> AppResult<CartLine>;

    /// Deletes the line. Fails with `NotInCart` when it is absent.
    async fn remove(&self, user_id: i64, product_id: i64) -> AppResult<()>;

    /// Lines ordered by `added_at`, then id.
    async fn list(&self, user_id: i64) -> AppResult<Vec<CartLine>>;

    /// Deletes every line of the user and returns how many were removed.
    async fn clear(&self, user_id: i64) -> AppResult<usize>;
}

/// Aggregates the stores for convenient access.
///
/// Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Repositories {
    pub favorites: Arc<dyn FavoriteStore>,
    pub cart: Arc<dyn CartStore>,
}

impl Repositories {
    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self {
            favorites: Arc::new(FavoriteRepository::new(pool.clone())),
            cart: Arc::new(CartRepository::new(pool)),
        }
    }

    /// Process-local stores; state is lost on restart.
    pub fn memory() -> Self {
        Self {
            favorites: Arc::new(MemoryFavoriteStore::default()),
            cart: Arc::new(MemoryCartStore::default()),
        }
    }
}
