//! Favorite repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::FavoriteStore;
use crate::db::{AsyncDbPool, pool_error};
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::NewFavorite;

/// Favorite repository holding an async connection pool.
///
/// `AsyncDbPool` is reference counted internally, so cloning is cheap.
#[derive(Clone)]
pub struct FavoriteRepository {
    pool: AsyncDbPool,
}

impl FavoriteRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteStore for FavoriteRepository {
    /// Insert-on-conflict-do-nothing, so two racing adds of the same pair
    /// cannot both succeed.
    async fn add(&self, uid: i64, pid: i64) -> AppResult<()> {
        use crate::schema::favorites::dsl::*;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let inserted = diesel::insert_into(favorites)
            .values(&NewFavorite {
                user_id: uid,
                product_id: pid,
            })
            .on_conflict((user_id, product_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "add favorite"))?;

        if inserted == 0 {
            return Err(AppError::AlreadyFavorited {
                user_id: uid,
                product_id: pid,
            });
        }

        tracing::debug!(user_id = uid, product_id = pid, "Favorite added");
        Ok(())
    }

    async fn remove(&self, uid: i64, pid: i64) -> AppResult<()> {
        use crate::schema::favorites::dsl::*;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let deleted = diesel::delete(favorites.filter(user_id.eq(uid)).filter(product_id.eq(pid)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "remove favorite"))?;

        if deleted == 0 {
            return Err(AppError::NotFavorited {
                user_id: uid,
                product_id: pid,
            });
        }

        tracing::debug!(user_id = uid, product_id = pid, "Favorite removed");
        Ok(())
    }

    async fn list_product_ids(&self, uid: i64) -> AppResult<Vec<i64>> {
        use crate::schema::favorites::dsl::*;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        favorites
            .filter(user_id.eq(uid))
            .order((added_at.asc(), id.asc()))
            .select(product_id)
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list favorites"))
    }

    async fn contains(&self, uid: i64, pid: i64) -> AppResult<bool> {
        use crate::schema::favorites::dsl::*;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::select(diesel::dsl::exists(
            favorites.filter(user_id.eq(uid)).filter(product_id.eq(pid)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "check favorite"))
    }
}
