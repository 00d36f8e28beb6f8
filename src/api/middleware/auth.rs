//! JWT authentication middleware.
//!
//! Validates bearer tokens and exposes the caller to handlers as `AuthUser`
//! (authentication required) or `Viewer` (authentication optional).

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_access_token};

/// Authenticated user, added to request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: claims.user_id()?,
            username: claims.username,
        })
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized {
                message: "Authentication required".to_string(),
            })
    }
}

/// The user a catalog response is personalized for, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer(pub Option<i64>);

impl<S: Send + Sync> FromRequestParts<S> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Viewer(
            parts.extensions.get::<AuthUser>().map(|user| user.user_id),
        ))
    }
}

fn bearer_token(request: &Request) -> Result<&str, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing authorization header".to_string(),
        })?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        })
}

fn authenticate(request: &Request, secret: &str) -> Result<AuthUser, AppError> {
    let token = bearer_token(request)?;
    let claims = validate_access_token(token, secret)?;
    AuthUser::try_from(claims)
}

/// Rejects the request with 401 unless it carries a valid access token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&request, &state.jwt_config.secret)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Attaches the user when a valid token is present and otherwise continues
/// anonymously. A bad token is not an error here.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&request, &state.jwt_config.secret) {
        Ok(user) => {
            request.extensions_mut().insert(user);
        }
        Err(e) if request.headers().contains_key(header::AUTHORIZATION) => {
            tracing::debug!(error = %e, "Ignoring invalid token on optional auth route");
        }
        Err(_) => {}
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::TokenType;
    use axum::body::Body;

    fn claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            username: "testuser".to_string(),
            token_type: TokenType::Access,
            iat: 0,
            exp: 9999999999,
        }
    }

    #[test]
    fn test_auth_user_from_claims() {
        let user = AuthUser::try_from(claims("123")).unwrap();
        assert_eq!(user.user_id, 123);
        assert_eq!(user.username, "testuser");
    }

    #[test]
    fn test_auth_user_rejects_non_numeric_subject() {
        assert!(matches!(
            AuthUser::try_from(claims("invalid")),
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_bearer_prefix_is_required() {
        let request = Request::builder()
            .header(header::AUTHORIZATION, "Token abc")
            .body(Body::empty())
            .unwrap();
        assert!(matches!(
            bearer_token(&request),
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_viewer_without_user_is_anonymous() {
        let (mut parts, _) = Request::builder().body(Body::empty()).unwrap().into_parts();
        let viewer = Viewer::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(viewer, Viewer(None));

        parts.extensions.insert(AuthUser {
            user_id: 9,
            username: "u".to_string(),
        });
        let viewer = Viewer::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(viewer, Viewer(Some(9)));
    }
}
