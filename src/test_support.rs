//! Test doubles shared by service and router tests.

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::external::catalog::{CatalogPage, CatalogSource, ListQuery, Product};
use crate::repositories::{FavoriteStore, MemoryFavoriteStore};

pub fn product(id: i64, price: f64) -> Product {
    Product {
        id,
        title: format!("Product {}", id),
        description: format!("Description of product {}", id),
        category: "groceries".to_string(),
        price,
        discount_percentage: 0.0,
        rating: 4.0,
        stock: 10,
        brand: None,
        tags: vec![],
        thumbnail: String::new(),
        images: vec![],
    }
}

/// In-process catalog that counts calls per operation.
#[derive(Default)]
pub struct StubCatalog {
    products: Vec<Product>,
    failing: AtomicBool,
    latency: Duration,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    search_calls: AtomicUsize,
}

impl StubCatalog {
    pub fn with_products(ids: RangeInclusive<i64>) -> Self {
        Self::from_products(ids.map(|id| product(id, id as f64 + 0.99)).collect())
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            products,
            ..Default::default()
        }
    }

    /// Delays every product lookup by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::catalog_unavailable(
                "stub catalog is failing",
                anyhow::anyhow!("HTTP 503"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for StubCatalog {
    async fn list_products(&self, query: &ListQuery) -> AppResult<CatalogPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let products: Vec<Product> = self
            .products
            .iter()
            .skip(query.skip as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok(CatalogPage {
            total: self.products.len() as i64,
            skip: i64::from(query.skip),
            limit: products.len() as i64,
            products,
        })
    }

    async fn get_product(&self, id: i64) -> AppResult<Product> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.check_available()?;

        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::product_not_found(id))
    }

    async fn search_products(&self, term: &str) -> AppResult<CatalogPage> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let needle = term.to_lowercase();
        let products: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(CatalogPage {
            total: products.len() as i64,
            skip: 0,
            limit: products.len() as i64,
            products,
        })
    }
}

/// Memory favorites that count read operations.
#[derive(Default)]
pub struct CountingFavorites {
    inner: MemoryFavoriteStore,
    reads: AtomicUsize,
}

impl CountingFavorites {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FavoriteStore for CountingFavorites {
    async fn add(&self, user_id: i64, product_id: i64) -> AppResult<()> {
        self.inner.add(user_id, product_id).await
    }

    async fn remove(&self, user_id: i64, product_id: i64) -> AppResult<()> {
        self.inner.remove(user_id, product_id).await
    }

    async fn list_product_ids(&self, user_id: i64) -> AppResult<Vec<i64>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.list_product_ids(user_id).await
    }

    async fn contains(&self, user_id: i64, product_id: i64) -> AppResult<bool> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.contains(user_id, product_id).await
    }
}
