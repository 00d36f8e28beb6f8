//! Cart request handlers. All routes require authentication.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};

use crate::api::dto::{AddToCartRequest, CartItemResponse, CartResponse};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes:
/// - GET /                 - The caller's cart with totals
/// - POST /                - Add or merge a line (201)
/// - DELETE /              - Clear the cart (204)
/// - DELETE /{product_id}  - Remove one line (204, 404 when absent)
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).post(add_to_cart).delete(clear_cart))
        .route("/{product_id}", delete(remove_from_cart))
}

async fn get_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<CartResponse>, AppError> {
    let cart = state.services.cart.get_cart(user.user_id).await?;
    Ok(Json(cart.into()))
}

async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartItemResponse>), AppError> {
    let line = state
        .services
        .cart
        .add_item(user.user_id, payload.product_id, payload.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(line.into())))
}

async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .services
        .cart
        .remove_item(user.user_id, product_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, AppError> {
    state.services.cart.clear_cart(user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
