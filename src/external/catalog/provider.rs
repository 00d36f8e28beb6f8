use async_trait::async_trait;

use super::types::{CatalogPage, ListQuery, Product};
use crate::error::AppResult;

/// Read-only access to the remote product catalog.
///
/// Every call is exactly one upstream request. Failures surface as
/// `AppError::CatalogUnavailable`, except an unknown product id on
/// `get_product`, which is `AppError::NotFound`.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_products(&self, query: &ListQuery) -> AppResult<CatalogPage>;
    async fn get_product(&self, id: i64) -> AppResult<Product>;
    async fn search_products(&self, term: &str) -> AppResult<CatalogPage>;
}
