//! Process-local stores backed by `DashMap`.
//!
//! Every mutation runs under the per-user shard entry lock, so operations on
//! one user are serialized while different users proceed in parallel.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{CartStore, FavoriteStore};
use crate::error::{AppError, AppResult};
use crate::models::{CartLine, NewCartItem};

#[derive(Default)]
pub struct MemoryFavoriteStore {
    entries: DashMap<i64, Vec<i64>>,
}

#[async_trait]
impl FavoriteStore for MemoryFavoriteStore {
    async fn add(&self, user_id: i64, product_id: i64) -> AppResult<()> {
        let mut ids = self.entries.entry(user_id).or_default();
        if ids.contains(&product_id) {
            return Err(AppError::AlreadyFavorited {
                user_id,
                product_id,
            });
        }
        ids.push(product_id);
        Ok(())
    }

    async fn remove(&self, user_id: i64, product_id: i64) -> AppResult<()> {
        let not_favorited = AppError::NotFavorited {
            user_id,
            product_id,
        };
        let mut ids = self.entries.get_mut(&user_id).ok_or(not_favorited)?;
        match ids.iter().position(|id| *id == product_id) {
            Some(index) => {
                ids.remove(index);
                Ok(())
            }
            None => Err(AppError::NotFavorited {
                user_id,
                product_id,
            }),
        }
    }

    async fn list_product_ids(&self, user_id: i64) -> AppResult<Vec<i64>> {
        Ok(self
            .entries
            .get(&user_id)
            .map(|ids| ids.clone())
            .unwrap_or_default())
    }

    async fn contains(&self, user_id: i64, product_id: i64) -> AppResult<bool> {
        Ok(self
            .entries
            .get(&user_id)
            .is_some_and(|ids| ids.contains(&product_id)))
    }
}

/// Lines are kept in insertion order, which is `added_at` order.
pub struct MemoryCartStore {
    lines: DashMap<i64, Vec<CartLine>>,
    next_id: AtomicI64,
}

impl Default for MemoryCartStore {
    fn default() -> Self {
        Self {
            lines: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn add_or_merge(&self, item: NewCartItem) -> AppResult<CartLine> {
        let mut lines = self.lines.entry(item.user_id).or_default();

        if let Some(line) = lines.iter_mut().find(|l| l.product_id == item.product_id) {
            line.quantity =
                line.quantity
                    .checked_add(item.quantity)
                    .ok_or_else(|| AppError::Validation {
                        field: "quantity".to_string(),
                        reason: "Total quantity is out of range".to_string(),
                    })?;
            return Ok(line.clone());
        }

        let line = CartLine {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            user_id: item.user_id,
            product_id: item.product_id,
            product_title: item.product_title,
            product_price: item.product_price,
            quantity: item.quantity,
            added_at: jiff::Timestamp::now(),
        };
        lines.push(line.clone());
        Ok(line)
    }

    async fn remove(&self, user_id: i64, product_id: i64) -> AppResult<()> {
        let removed = self
            .lines
            .get_mut(&user_id)
            .and_then(|mut lines| {
                let index = lines.iter().position(|l| l.product_id == product_id)?;
                Some(lines.remove(index))
            });

        match removed {
            Some(_) => Ok(()),
            None => Err(AppError::NotInCart {
                user_id,
                product_id,
            }),
        }
    }

    async fn list(&self, user_id: i64) -> AppResult<Vec<CartLine>> {
        Ok(self
            .lines
            .get(&user_id)
            .map(|lines| lines.clone())
            .unwrap_or_default())
    }

    async fn clear(&self, user_id: i64) -> AppResult<usize> {
        Ok(self
            .lines
            .remove(&user_id)
            .map(|(_, lines)| lines.len())
            .unwrap_or(0))
    }
}
