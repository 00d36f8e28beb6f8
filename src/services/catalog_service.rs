//! Viewer-personalized catalog reads.
//!
//! Raw catalog pages and products are memoized in the `QueryCache` under
//! viewer-independent keys. The favorite overlay is applied on every call and
//! never cached.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::cache::QueryCache;
use crate::error::AppResult;
use crate::external::catalog::{CatalogPage, CatalogSource, ListQuery, Product};
use crate::repositories::FavoriteStore;

/// A product with the viewer's favorite flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub is_favorite: bool,
}

/// A listing or search result as returned to a viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingResult {
    pub products: Vec<ProductView>,
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    source: Arc<dyn CatalogSource>,
    cache: QueryCache,
    favorites: Arc<dyn FavoriteStore>,
}

impl CatalogService {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        cache: QueryCache,
        favorites: Arc<dyn FavoriteStore>,
    ) -> Self {
        Self {
            source,
            cache,
            favorites,
        }
    }

    /// Lists products, loading the viewer's favorites once per call.
    pub async fn list_products(
        &self,
        query: &ListQuery,
        viewer: Option<i64>,
    ) -> AppResult<ListingResult> {
        let page: CatalogPage = self
            .cache
            .get_or_compute(&query.cache_key(), || self.source.list_products(query))
            .await?;

        self.overlay_page(page, viewer).await
    }

    /// Gets one product, flagged for the viewer.
    ///
    /// # Errors
    /// `NotFound` when the catalog does not know the id.
    pub async fn get_product(&self, id: i64, viewer: Option<i64>) -> AppResult<ProductView> {
        let product: Product = self
            .cache
            .get_or_compute(&format!("product:{}", id), || self.source.get_product(id))
            .await?;

        let is_favorite = match viewer {
            Some(user_id) => self.favorites.contains(user_id, id).await?,
            None => false,
        };

        Ok(ProductView {
            product,
            is_favorite,
        })
    }

    /// Full-text search. Results are not cached.
    pub async fn search(&self, term: &str, viewer: Option<i64>) -> AppResult<ListingResult> {
        let page = self.source.search_products(term).await?;
        self.overlay_page(page, viewer).await
    }

    /// The product as the catalog reports it right now, bypassing the cache.
    /// Used where a stale price must not leak into persistent state.
    pub async fn resolve_product(&self, id: i64) -> AppResult<Product> {
        self.source.get_product(id).await
    }

    async fn overlay_page(
        &self,
        page: CatalogPage,
        viewer: Option<i64>,
    ) -> AppResult<ListingResult> {
        let favorite_ids: HashSet<i64> = match viewer {
            Some(user_id) => self
                .favorites
                .list_product_ids(user_id)
                .await?
                .into_iter()
                .collect(),
            None => HashSet::new(),
        };

        let products = page
            .products
            .into_iter()
            .map(|product| ProductView {
                is_favorite: favorite_ids.contains(&product.id),
                product,
            })
            .collect();

        Ok(ListingResult {
            products,
            total: page.total,
            skip: page.skip,
            limit: page.limit,
        })
    }
}
