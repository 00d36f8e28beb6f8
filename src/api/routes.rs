//! Router configuration for the API.

use std::time::Duration;

use axum::{
    Router,
    http::{Method, StatusCode, header},
    middleware,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};

use crate::api::handlers;
use crate::api::middleware::{
    auth_middleware, global_error_handler, logging_middleware, optional_auth_middleware,
    request_id_middleware,
};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Layers run outermost first:
/// 1. Request ID
/// 2. Logging (span carries the request ID)
/// 3. Compression
/// 4. CORS
/// 5. Error normalization (adds the request ID to error bodies)
/// 6. Request timeout
///
/// # Routes
/// - `/api/health` - Liveness and readiness
/// - `/api/products` - Catalog, optional authentication
/// - `/api/favorites` - Favorites, authentication required
/// - `/api/cart` - Cart, authentication required
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let products = handlers::products::product_routes().route_layer(
        middleware::from_fn_with_state(state.clone(), optional_auth_middleware),
    );
    let favorites = handlers::favorites::favorite_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
    let cart = handlers::cart::cart_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api_routes = Router::new()
        .merge(handlers::health::health_routes())
        .nest("/products", products)
        .nest("/favorites", favorites)
        .nest("/cart", cart);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .nest("/api", api_routes)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::from_fn(global_error_handler))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
