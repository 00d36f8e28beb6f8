use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use super::types::{DummyProduct, DummyProductList};
use crate::error::{AppError, AppResult};
use crate::external::catalog::provider::CatalogSource;
use crate::external::catalog::types::{CatalogPage, ListQuery, Product};

/// HTTP client for a DummyJSON-compatible catalog
/// (`/products`, `/products/{id}`, `/products/search`).
#[derive(Clone)]
pub struct DummyJsonCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl DummyJsonCatalog {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn make_error(message: impl Into<String>, source: anyhow::Error) -> AppError {
        AppError::CatalogUnavailable {
            message: message.into(),
            source,
        }
    }

    fn url(&self, operation: &str, path: &str, params: &[(&str, String)]) -> AppResult<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse_with_params(&raw, params).map_err(|e| {
            Self::make_error(
                format!("{} invalid catalog URL {}: {}", operation, raw, e),
                e.into(),
            )
        })
    }

    /// Sends one GET and returns the raw response whatever its status.
    async fn send(&self, operation: &str, url: Url) -> AppResult<reqwest::Response> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e: reqwest::Error| {
                tracing::warn!(url = %url, error = %e, "Catalog request failed");
                Self::make_error(format!("{} request failed: {}", operation, e), e.into())
            })?;

        tracing::debug!(url = %url, status = resp.status().as_u16(), "Catalog response");
        Ok(resp)
    }

    async fn decode<T: DeserializeOwned>(operation: &str, resp: reqwest::Response) -> AppResult<T> {
        let resp = resp.error_for_status().map_err(|e: reqwest::Error| {
            Self::make_error(format!("{} HTTP error: {}", operation, e), e.into())
        })?;

        resp.json().await.map_err(|e: reqwest::Error| {
            Self::make_error(format!("{} invalid JSON: {}", operation, e), e.into())
        })
    }
}

/// Query parameters for a listing. `sortBy` and `order` are only sent
/// together, and only when a sort field is set.
pub(super) fn list_params(query: &ListQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("limit", query.limit.to_string()),
        ("skip", query.skip.to_string()),
    ];
    if let Some((field, order)) = query.sort() {
        params.push(("sortBy", field.to_string()));
        params.push(("order", order.as_str().to_string()));
    }
    params
}

#[async_trait]
impl CatalogSource for DummyJsonCatalog {
    async fn list_products(&self, query: &ListQuery) -> AppResult<CatalogPage> {
        let operation = format!("list_products(limit={}, skip={})", query.limit, query.skip);
        let url = self.url(&operation, "/products", &list_params(query))?;
        let resp = self.send(&operation, url).await?;

        let list: DummyProductList = Self::decode(&operation, resp).await?;
        Ok(list.into())
    }

    async fn get_product(&self, id: i64) -> AppResult<Product> {
        let operation = format!("get_product({})", id);
        let url = self.url(&operation, &format!("/products/{}", id), &[])?;
        let resp = self.send(&operation, url).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(AppError::product_not_found(id));
        }

        let product: DummyProduct = Self::decode(&operation, resp).await?;
        Ok(product.into())
    }

    async fn search_products(&self, term: &str) -> AppResult<CatalogPage> {
        let operation = format!("search_products({:?})", term);
        let url = self.url(&operation, "/products/search", &[("q", term.to_string())])?;
        let resp = self.send(&operation, url).await?;

        let list: DummyProductList = Self::decode(&operation, resp).await?;
        let mut page: CatalogPage = list.into();
        // Search results are reported as one unpaged window
        page.skip = 0;
        page.limit = page.products.len() as i64;
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::external::catalog::SortOrder;
    use crate::external::client::build_http_client;
    use httpmock::MockServer;
    use serde_json::json;

    fn catalog(server: &MockServer) -> DummyJsonCatalog {
        let client = build_http_client(&CatalogConfig::default()).unwrap();
        DummyJsonCatalog::new(client, server.base_url())
    }

    fn product_json(id: i64, title: &str, price: f64) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "description": "A product",
            "category": "beauty",
            "price": price,
            "discountPercentage": 10.5,
            "rating": 4.5,
            "stock": 12,
            "brand": "Essence",
            "sku": "ignored",
            "thumbnail": "https://cdn.example/thumb.png",
            "images": ["https://cdn.example/1.png"]
        })
    }

    #[test]
    fn test_list_params_without_sort() {
        let params = list_params(&ListQuery::new(10, 0, None, SortOrder::Desc));
        assert_eq!(
            params,
            vec![("limit", "10".to_string()), ("skip", "0".to_string())]
        );
    }

    #[test]
    fn test_list_params_with_sort() {
        let query = ListQuery::new(5, 10, Some("price".to_string()), SortOrder::Desc);
        let params = list_params(&query);
        assert!(params.contains(&("sortBy", "price".to_string())));
        assert!(params.contains(&("order", "desc".to_string())));
    }

    #[tokio::test]
    async fn test_list_products_translates_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/products")
                    .query_param("limit", "2")
                    .query_param("skip", "4")
                    .query_param("sortBy", "price")
                    .query_param("order", "asc");
                then.status(200).json_body(json!({
                    "products": [product_json(5, "Red Lipstick", 12.99), product_json(6, "Eyeliner", 3.5)],
                    "total": 194,
                    "skip": 4,
                    "limit": 2
                }));
            })
            .await;

        let query = ListQuery::new(2, 4, Some("price".to_string()), SortOrder::Asc);
        let page = catalog(&server).list_products(&query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.total, 194);
        assert_eq!(page.skip, 4);
        assert_eq!(page.limit, 2);
        assert_eq!(page.products.len(), 2);
        assert_eq!(page.products[0].id, 5);
        assert_eq!(page.products[0].discount_percentage, 10.5);
    }

    #[tokio::test]
    async fn test_missing_optional_fields_default_to_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/products/42");
                then.status(200)
                    .json_body(json!({"id": 42, "title": "Plain Apple", "price": 1.99}));
            })
            .await;

        let product = catalog(&server).get_product(42).await.unwrap();
        assert_eq!(product.title, "Plain Apple");
        assert_eq!(product.brand, None);
        assert!(product.description.is_empty());
        assert!(product.images.is_empty());
    }

    #[tokio::test]
    async fn test_get_product_404_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/products/9999");
                then.status(404)
                    .json_body(json!({"message": "Product with id '9999' not found"}));
            })
            .await;

        let err = catalog(&server).get_product(9999).await.unwrap_err();
        match err {
            AppError::NotFound { entity, value, .. } => {
                assert_eq!(entity, "product");
                assert_eq!(value, "9999");
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_catalog_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/products");
                then.status(503).body("maintenance");
            })
            .await;

        let err = catalog(&server)
            .list_products(&ListQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CatalogUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_unparsable_body_is_catalog_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/products/1");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let err = catalog(&server).get_product(1).await.unwrap_err();
        assert!(matches!(err, AppError::CatalogUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_catalog_unavailable() {
        let client = build_http_client(&CatalogConfig::default()).unwrap();
        let catalog = DummyJsonCatalog::new(client, "http://127.0.0.1:1");

        let err = catalog.search_products("phone").await.unwrap_err();
        assert!(matches!(err, AppError::CatalogUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_search_reports_unpaged_window() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/products/search")
                    .query_param("q", "phone case");
                then.status(200).json_body(json!({
                    "products": [product_json(101, "Phone Case", 19.99)],
                    "total": 23,
                    "skip": 0,
                    "limit": 30
                }));
            })
            .await;

        let page = catalog(&server).search_products("phone case").await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.total, 23);
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, 1);
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_live_dummyjson_product() {
        let client = build_http_client(&CatalogConfig::default()).unwrap();
        let catalog = DummyJsonCatalog::new(client, "https://dummyjson.com");

        let product = catalog.get_product(1).await.unwrap();
        assert_eq!(product.id, 1);
    }
}
