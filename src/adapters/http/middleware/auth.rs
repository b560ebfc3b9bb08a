//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `cookie_auth_middleware` - Layer that validates the session cookie and
//!   injects the user into request extensions
//! - `RequireAuth` - Extractor that requires authentication
//!
//! # Architecture
//!
//! The middleware uses the `SessionValidator` port, so the token scheme behind
//! the cookie can change without touching the routes.
//!
//! ```text
//! Request → cookie_auth_middleware → injects AuthenticatedUser into extensions
//!                                             ↓
//!                                     Handler → RequireAuth reads from extensions
//! ```
//!
//! # Example
//!
//! ```ignore
//! let auth = CookieAuth::new(validator, "jwt");
//!
//! let app = Router::new()
//!     .route("/api/diagram", put(put_diagram))
//!     .layer(middleware::from_fn_with_state(auth, cookie_auth_middleware));
//! ```

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::websocket::cookie_value;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

use super::super::error::ErrorResponse;

/// Middleware state: the validator and the cookie that carries the token.
#[derive(Clone)]
pub struct CookieAuth {
    pub validator: Arc<dyn SessionValidator>,
    pub cookie_name: Arc<str>,
}

impl CookieAuth {
    pub fn new(validator: Arc<dyn SessionValidator>, cookie_name: impl Into<Arc<str>>) -> Self {
        Self {
            validator,
            cookie_name: cookie_name.into(),
        }
    }
}

/// Authentication middleware that validates the session cookie.
///
/// This middleware:
/// 1. Reads the token from the configured cookie
/// 2. Validates the token using the `SessionValidator` port
/// 3. On success, injects `AuthenticatedUser` into request extensions
/// 4. On missing cookie, continues without injecting
/// 5. On a refused token, returns 401 (503 when the validator is down)
pub async fn cookie_auth_middleware(
    State(auth): State<CookieAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = cookie_value(request.headers(), &auth.cookie_name) else {
        return next.run(request).await;
    };

    match auth.validator.validate(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => auth_error_response(&e),
    }
}

fn auth_error_response(error: &AuthError) -> Response {
    let (status, message) = match error {
        AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
        AuthError::TokenRevoked => (StatusCode::UNAUTHORIZED, "Token revoked"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
        AuthError::ServiceUnavailable(msg) => {
            tracing::error!(error = %msg, "Auth service unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Authentication service unavailable",
            )
        }
    };

    (status, Json(ErrorResponse::new(message, "AUTH_ERROR"))).into_response()
}

/// Extractor that requires authentication.
///
/// Returns 401 when the middleware did not put a user into the extensions.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid session cookie was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Authentication required", "UNAUTHENTICATED")),
            )
                .into_response(),
        }
    }
}
