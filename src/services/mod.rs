//! Service layer for business logic operations.
//!
//! Services encapsulate business rules and coordinate between the catalog,
//! the query cache and the per-user stores.

mod cart_service;
mod catalog_service;
mod favorite_service;

pub use cart_service::CartService;
pub use catalog_service::{CatalogService, ListingResult, ProductView};
pub use favorite_service::FavoriteService;

use std::sync::Arc;

use crate::cache::QueryCache;
use crate::external::catalog::CatalogSource;
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Services {
    pub catalog: CatalogService,
    pub favorites: FavoriteService,
    pub cart: CartService,
}

impl Services {
    pub fn new(repos: Repositories, source: Arc<dyn CatalogSource>, cache: QueryCache) -> Self {
        let catalog = CatalogService::new(source, cache, Arc::clone(&repos.favorites));
        Self {
            favorites: FavoriteService::new(repos.favorites),
            cart: CartService::new(repos.cart, catalog.clone()),
            catalog,
        }
    }
}
