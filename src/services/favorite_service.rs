//! Favorite management on top of a `FavoriteStore`.

use std::sync::Arc;

use crate::error::AppResult;
use crate::repositories::FavoriteStore;

#[derive(Clone)]
pub struct FavoriteService {
    store: Arc<dyn FavoriteStore>,
}

impl FavoriteService {
    pub fn new(store: Arc<dyn FavoriteStore>) -> Self {
        Self { store }
    }

    /// Marks a product as favorite. The product id is not checked against
    /// the catalog.
    ///
    /// # Errors
    /// `AlreadyFavorited` when the pair exists.
    pub async fn add_favorite(&self, user_id: i64, product_id: i64) -> AppResult<()> {
        self.store.add(user_id, product_id).await?;
        tracing::info!(user_id, product_id, "Product added to favorites");
        Ok(())
    }

    /// # Errors
    /// `NotFavorited` when the pair does not exist.
    pub async fn remove_favorite(&self, user_id: i64, product_id: i64) -> AppResult<()> {
        self.store.remove(user_id, product_id).await?;
        tracing::info!(user_id, product_id, "Product removed from favorites");
        Ok(())
    }

    pub async fn list_favorites(&self, user_id: i64) -> AppResult<Vec<i64>> {
        self.store.list_product_ids(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::repositories::MemoryFavoriteStore;

    fn service() -> FavoriteService {
        FavoriteService::new(Arc::new(MemoryFavoriteStore::default()))
    }

    #[tokio::test]
    async fn test_second_add_is_rejected() {
        let service = service();

        service.add_favorite(1, 7).await.unwrap();
        let err = service.add_favorite(1, 7).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::AlreadyFavorited {
                user_id: 1,
                product_id: 7
            }
        ));
        assert_eq!(service.list_favorites(1).await.unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn test_remove_never_added_is_rejected() {
        let err = service().remove_favorite(1, 7).await.unwrap_err();
        assert!(matches!(err, AppError::NotFavorited { .. }));
    }

    #[tokio::test]
    async fn test_remove_then_add_again() {
        let service = service();

        service.add_favorite(3, 1).await.unwrap();
        service.remove_favorite(3, 1).await.unwrap();
        assert!(service.list_favorites(3).await.unwrap().is_empty());

        service.add_favorite(3, 1).await.unwrap();
        assert_eq!(service.list_favorites(3).await.unwrap(), vec![1]);
    }
}
