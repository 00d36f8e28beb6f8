//! Health check endpoint handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use diesel_async::RunQueryDsl;

use crate::api::dto::{HealthResponse, HealthStatus};
use crate::state::AppState;

/// # Routes
/// - `GET /health` - Liveness
/// - `GET /health/ready` - Readiness (checks the database when one is used)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(liveness_check))
        .route("/health/ready", get(readiness_check))
}

fn health(status: HealthStatus) -> HealthResponse {
    HealthResponse {
        status,
        version: crate::pkg_version().to_string(),
        timestamp: jiff::Timestamp::now().to_string(),
    }
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(health(HealthStatus::Healthy))
}

pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let Some(pool) = &state.db_pool else {
        return (StatusCode::OK, Json(health(HealthStatus::Healthy)));
    };

    let start = std::time::Instant::now();
    let result = match pool.get().await {
        Ok(mut conn) => diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match result {
        Ok(()) => {
            tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Database ready");
            (StatusCode::OK, Json(health(HealthStatus::Healthy)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(health(HealthStatus::Unhealthy)),
            )
        }
    }
}
