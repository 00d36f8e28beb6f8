//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError` renders itself as an `ErrorResponse` and also stores that value
//! in the response extensions. `global_error_handler` uses it to stamp the
//! request id into the body, and turns bare error responses from axum or
//! tower-http (unknown route, timeout) into the same JSON shape.

use axum::{
    Json,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::CatalogUnavailable { .. } => StatusCode::BAD_GATEWAY,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::AlreadyFavorited { .. } => StatusCode::CONFLICT,
            AppError::NotFavorited { .. } => StatusCode::NOT_FOUND,
            AppError::NotInCart { .. } => StatusCode::NOT_FOUND,
            AppError::Duplicate { .. } => StatusCode::CONFLICT,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::CatalogUnavailable { .. } => "CATALOG_UNAVAILABLE",
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::AlreadyFavorited { .. } => "ALREADY_FAVORITED",
            AppError::NotFavorited { .. } => "NOT_FAVORITED",
            AppError::NotInCart { .. } => "NOT_IN_CART",
            AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::BadRequest { .. } => "BAD_REQUEST",
            AppError::Unauthorized { .. } => "UNAUTHORIZED",
            AppError::Database { .. } => "DATABASE_ERROR",
            AppError::Configuration { .. } => "CONFIGURATION_ERROR",
            AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Client-facing body. Sources of server-side failures are never included.
    pub fn to_error_response(&self) -> ErrorResponse {
        let code = self.error_code();
        match self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::not_found_error(entity, field, value),
            AppError::Duplicate {
                entity,
                field,
                value,
            } => ErrorResponse::duplicate_error(entity, field, value),
            AppError::Validation { field, reason } => {
                ErrorResponse::validation_error(field, reason)
            }
            AppError::AlreadyFavorited { product_id, .. }
            | AppError::NotFavorited { product_id, .. }
            | AppError::NotInCart { product_id, .. } => {
                ErrorResponse::new(code, &self.to_string())
                    .with_details(json!({ "product_id": product_id }))
            }
            AppError::BadRequest { message } | AppError::Unauthorized { message } => {
                ErrorResponse::new(code, message)
            }
            AppError::CatalogUnavailable { .. } => {
                ErrorResponse::new(code, "The product catalog is currently unavailable")
            }
            AppError::Database { operation, .. } => ErrorResponse::new(
                code,
                &format!("Database operation failed: {}", operation),
            ),
            AppError::Configuration { key, .. } => {
                ErrorResponse::new(code, &format!("Configuration error: {}", key))
            }
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new(code, "Database connection unavailable")
            }
            AppError::Internal { .. } => ErrorResponse::new(code, "An internal error occurred"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = self.to_error_response();
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Normalizes every error response to `ErrorResponse` and adds the request
/// id when one is known.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().cloned();
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let body = match response.extensions().get::<ErrorResponse>() {
        Some(body) => body.clone(),
        None if is_json(&response) => return response,
        None => fallback_error(status),
    };
    let body = match request_id {
        Some(RequestId(id)) => body.with_request_id(&id),
        None => body,
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_ENCODING);
    let mut response = (status, Json(body)).into_response();
    for (name, value) in parts.headers.iter() {
        if !response.headers().contains_key(name) {
            response.headers_mut().insert(name.clone(), value.clone());
        }
    }
    response
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

fn fallback_error(status: StatusCode) -> ErrorResponse {
    match status {
        StatusCode::NOT_FOUND => {
            ErrorResponse::new("NOT_FOUND", "The requested resource was not found")
        }
        StatusCode::METHOD_NOT_ALLOWED => ErrorResponse::new(
            "METHOD_NOT_ALLOWED",
            "HTTP method not allowed for this endpoint",
        ),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => {
            ErrorResponse::new("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type")
        }
        StatusCode::REQUEST_TIMEOUT => ErrorResponse::new("REQUEST_TIMEOUT", "Request timeout"),
        StatusCode::PAYLOAD_TOO_LARGE => {
            ErrorResponse::new("PAYLOAD_TOO_LARGE", "Request payload too large")
        }
        s if s.is_server_error() => {
            ErrorResponse::new("INTERNAL_SERVER_ERROR", "An internal server error occurred")
        }
        _ => ErrorResponse::new("BAD_REQUEST", "Bad request"),
    }
}
