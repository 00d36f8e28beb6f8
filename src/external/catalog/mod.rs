//! Remote product catalog access.

mod dummyjson;
mod provider;
mod types;

pub use dummyjson::DummyJsonCatalog;
pub use provider::CatalogSource;
pub use types::{CatalogPage, ListQuery, Product, SortOrder};
