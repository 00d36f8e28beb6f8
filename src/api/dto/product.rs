//! Catalog query parameters.

use serde::Deserialize;
use validator::Validate;

use crate::external::catalog::{ListQuery, SortOrder};

fn default_limit() -> u32 {
    10
}

/// `GET /api/products?limit=&skip=&sortBy=&order=`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    #[serde(default = "default_limit")]
    #[validate(range(max = 100, message = "Limit must be at most 100"))]
    pub limit: u32,
    #[serde(default)]
    pub skip: u32,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
}

impl From<ProductListParams> for ListQuery {
    fn from(params: ProductListParams) -> Self {
        ListQuery::new(params.limit, params.skip, params.sort_by, params.order)
    }
}

/// `GET /api/products/search?q=`
#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    #[validate(length(min = 1, message = "Search term must not be empty"))]
    pub q: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params: ProductListParams = serde_json::from_str("{}").unwrap();
        let query = ListQuery::from(params);
        assert_eq!(query, ListQuery::default());
    }

    #[test]
    fn test_limit_above_maximum_is_invalid() {
        let params: ProductListParams = serde_json::from_str(r#"{"limit":101}"#).unwrap();
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_sort_params_use_camel_case() {
        let params: ProductListParams =
            serde_json::from_str(r#"{"sortBy":"price","order":"desc"}"#).unwrap();
        let query = ListQuery::from(params);
        assert_eq!(query.sort(), Some(("price", SortOrder::Desc)));
    }
}
