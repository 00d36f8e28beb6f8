use serde::{Deserialize, Serialize};

/// A catalog product. Owned by the remote catalog and never persisted as a
/// whole; only the title and price are copied into cart lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i32,
    pub brand: Option<String>,
    pub tags: Vec<String>,
    pub thumbnail: String,
    pub images: Vec<String>,
}

/// One page of catalog results as reported by the upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub products: Vec<Product>,
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Parameters of a product listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: u32,
    pub skip: u32,
    /// Upstream field name, passed through unvalidated
    pub sort_by: Option<String>,
    pub order: SortOrder,
}

impl ListQuery {
    pub fn new(limit: u32, skip: u32, sort_by: Option<String>, order: SortOrder) -> Self {
        Self {
            limit,
            skip,
            sort_by: sort_by.filter(|s| !s.trim().is_empty()),
            order,
        }
    }

    /// The sort field and direction, present only when a non-empty sort
    /// field was requested.
    pub fn sort(&self) -> Option<(&str, SortOrder)> {
        self.sort_by.as_deref().map(|field| (field, self.order))
    }

    /// Key identifying the shared (viewer independent) result of this query.
    /// The order only participates when a sort field is set, since the
    /// upstream ignores it otherwise.
    pub fn cache_key(&self) -> String {
        match self.sort() {
            Some((field, order)) => format!(
                "products:{}:{}:{}:{}",
                self.limit,
                self.skip,
                field,
                order.as_str()
            ),
            None => format!("products:{}:{}", self.limit, self.skip),
        }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(10, 0, None, SortOrder::Asc)
    }
}
