//! Favorite request handlers. All routes require authentication.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Routes:
/// - GET /                 - Favorite product ids, oldest first
/// - POST /{product_id}    - Add (201, 409 when already present)
/// - DELETE /{product_id}  - Remove (204, 404 when absent)
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites))
        .route("/{product_id}", post(add_favorite).delete(remove_favorite))
}

async fn list_favorites(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<i64>>, AppError> {
    let ids = state.services.favorites.list_favorites(user.user_id).await?;
    Ok(Json(ids))
}

async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .services
        .favorites
        .add_favorite(user.user_id, product_id)
        .await?;
    Ok(StatusCode::CREATED)
}

async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .services
        .favorites
        .remove_favorite(user.user_id, product_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
