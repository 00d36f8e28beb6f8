use serde::Deserialize;

use crate::external::catalog::types::{CatalogPage, Product};

/// Product object as served by DummyJSON. Fields absent for some categories
/// default to empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DummyProduct {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DummyProductList {
    pub products: Vec<DummyProduct>,
    pub total: i64,
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub limit: i64,
}

impl From<DummyProduct> for Product {
    fn from(p: DummyProduct) -> Self {
        Product {
            id: p.id,
            title: p.title,
            description: p.description,
            category: p.category,
            price: p.price,
            discount_percentage: p.discount_percentage,
            rating: p.rating,
            stock: p.stock,
            brand: p.brand.filter(|b| !b.is_empty()),
            tags: p.tags,
            thumbnail: p.thumbnail,
            images: p.images,
        }
    }
}

impl From<DummyProductList> for CatalogPage {
    fn from(list: DummyProductList) -> Self {
        CatalogPage {
            products: list.products.into_iter().map(Product::from).collect(),
            total: list.total,
            skip: list.skip,
            limit: list.limit,
        }
    }
}
