//! Cart ledger: quantity merging, product snapshots and totals.

use std::str::FromStr;
use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::error::{AppError, AppResult};
use crate::models::{CartLine, CartView, NewCartItem};
use crate::repositories::CartStore;
use crate::services::CatalogService;

/// Longest title the `cart_items.product_title` column accepts.
const MAX_TITLE_CHARS: usize = 255;

#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn CartStore>,
    catalog: CatalogService,
}

impl CartService {
    pub fn new(store: Arc<dyn CartStore>, catalog: CatalogService) -> Self {
        Self { store, catalog }
    }

    /// Adds `quantity` units of a product to the user's cart.
    ///
    /// The product is resolved against the catalog first, bypassing the
    /// query cache, so a failed lookup aborts before anything is written. An
    /// existing line keeps its original title and price and only grows in
    /// quantity.
    ///
    /// # Errors
    /// * `Validation` when `quantity < 1`
    /// * `NotFound` when the catalog does not know the product
    /// * `CatalogUnavailable` when the catalog cannot be queried
    pub async fn add_item(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i32,
    ) -> AppResult<CartLine> {
        if quantity < 1 {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                reason: "Quantity must be at least 1".to_string(),
            });
        }

        let product = self.catalog.resolve_product(product_id).await?;
        let price = snapshot_price(product.price)?;

        let line = self
            .store
            .add_or_merge(NewCartItem {
                user_id,
                product_id,
                product_title: product.title.chars().take(MAX_TITLE_CHARS).collect(),
                product_price: price,
                quantity,
            })
            .await?;

        tracing::info!(
            user_id,
            product_id,
            added = quantity,
            quantity = line.quantity,
            "Cart line updated"
        );
        Ok(line)
    }

    /// # Errors
    /// `NotInCart` when the user has no line for the product.
    pub async fn remove_item(&self, user_id: i64, product_id: i64) -> AppResult<()> {
        self.store.remove(user_id, product_id).await?;
        tracing::info!(user_id, product_id, "Cart line removed");
        Ok(())
    }

    pub async fn get_cart(&self, user_id: i64) -> AppResult<CartView> {
        let items = self.store.list(user_id).await?;
        Ok(CartView::new(user_id, items))
    }

    /// Empties the cart. Succeeds on an empty cart.
    pub async fn clear_cart(&self, user_id: i64) -> AppResult<()> {
        let removed = self.store.clear(user_id).await?;
        tracing::info!(user_id, removed, "Cart cleared");
        Ok(())
    }
}

/// Snapshots are stored as `NUMERIC(10, 2)`, so they stay below 10^8.
const PRICE_LIMIT: i64 = 100_000_000;

/// Converts a catalog price into the two-decimal snapshot stored on a line.
/// Goes through the shortest decimal rendering so `999.99` stays exact.
fn snapshot_price(price: f64) -> AppResult<BigDecimal> {
    if !price.is_finite() || price < 0.0 {
        return Err(invalid_price(price));
    }

    let snapshot = BigDecimal::from_str(&price.to_string())
        .map(|decimal| decimal.round(2))
        .map_err(|e| AppError::catalog_unavailable(format!("unusable price {}", price), e))?;

    if snapshot >= BigDecimal::from(PRICE_LIMIT) {
        return Err(invalid_price(price));
    }
    Ok(snapshot)
}

fn invalid_price(price: f64) -> AppError {
    AppError::catalog_unavailable(
        format!("catalog reported an invalid price: {}", price),
        anyhow::anyhow!("invalid price {}", price),
    )
}
