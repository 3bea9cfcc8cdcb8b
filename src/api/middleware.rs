//! Authentication Middleware
//!
//! Validates the Bearer token on protected routes and stores the caller
//! identity in request extensions for handlers to pick up.

use crate::models::auth::Caller;
use crate::service::TokenService;
use crate::utils::error::AppError;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Extension type carrying the authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub Caller);

/// Authentication middleware that validates session tokens
///
/// Extracts the Authorization header, checks the Bearer format, verifies the
/// token signature and expiry, and inserts the caller identity into request
/// extensions. Any failure yields a 401 response.
pub async fn auth_middleware(
    State(token_service): State<Arc<TokenService>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Missing Authorization header".into()))?;

    if !auth_header.starts_with("Bearer ") {
        return Err(AppError::Authentication(
            "Invalid Authorization header format".into(),
        ));
    }

    let token = &auth_header[7..];

    let caller = token_service
        .verify(token)
        .map_err(|_| AppError::Authentication("Invalid or expired token".into()))?;

    request.extensions_mut().insert(AuthUser(caller));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Extension, Router,
    };
    use chrono::Utc;
    use tower::util::ServiceExt;

    fn test_token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new("test_secret_key".to_string()))
    }

    async fn test_handler(Extension(AuthUser(caller)): Extension<AuthUser>) -> String {
        caller.name
    }

    fn test_app(token_service: Arc<TokenService>) -> Router {
        Router::new()
            .route("/test", get(test_handler))
            .layer(from_fn_with_state(token_service, auth_middleware))
    }

    #[tokio::test]
    async fn test_auth_middleware_missing_header() {
        let app = test_app(test_token_service());

        let request = Request::builder()
            .method(Method::GET)
            .uri("/test")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_middleware_invalid_format() {
        let app = test_app(test_token_service());

        let request = Request::builder()
            .method(Method::GET)
            .uri("/test")
            .header(AUTHORIZATION, "Invalid token")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_middleware_garbage_token() {
        let app = test_app(test_token_service());

        let request = Request::builder()
            .method(Method::GET)
            .uri("/test")
            .header(AUTHORIZATION, "Bearer not.a.token")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_middleware_valid_token() {
        let token_service = test_token_service();
        let app = test_app(token_service.clone());

        let user = User {
            id: 7,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            is_admin: false,
            created_at: Utc::now(),
        };
        let token = token_service.issue(&user).unwrap();

        let request = Request::builder()
            .method(Method::GET)
            .uri("/test")
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
