//! Catalog request handlers. Authentication is optional; a valid token only
//! personalizes the favorite flags.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::api::dto::{ProductListParams, SearchParams};
use crate::api::middleware::Viewer;
use crate::error::AppError;
use crate::services::{ListingResult, ProductView};
use crate::state::AppState;
use crate::utils::validate::ValidatedQuery;

/// Routes:
/// - GET /              - Paginated, optionally sorted listing
/// - GET /search?q=     - Full-text search
/// - GET /{id}          - Product detail
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/search", get(search_products))
        .route("/{id}", get(get_product))
}

async fn list_products(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    ValidatedQuery(params): ValidatedQuery<ProductListParams>,
) -> Result<Json<ListingResult>, AppError> {
    let query = params.into();
    let result = state.services.catalog.list_products(&query, viewer).await?;
    Ok(Json(result))
}

async fn search_products(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> Result<Json<ListingResult>, AppError> {
    let result = state.services.catalog.search(&params.q, viewer).await?;
    Ok(Json(result))
}

async fn get_product(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Path(id): Path<i64>,
) -> Result<Json<ProductView>, AppError> {
    let product = state.services.catalog.get_product(id, viewer).await?;
    Ok(Json(product))
}
