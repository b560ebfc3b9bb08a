//! HTTP middleware for axum.
//!
//! - `auth` - Cookie authentication middleware and the `RequireAuth` extractor

pub mod auth;

pub use auth::{cookie_auth_middleware, AuthRejection, CookieAuth, RequireAuth};
