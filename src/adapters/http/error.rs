//! JSON error bodies shared by the HTTP routes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::foundation::DomainError;

/// Error body: `{"error": "<message>", "code": "<CODE>"}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, "BAD_REQUEST")
    }
}

/// Maps a domain error to a response.
///
/// Infrastructure failures keep their detail in the log and return a
/// generic message.
pub fn handle_domain_error(error: DomainError) -> Response {
    if !error.code.is_infrastructure() {
        let body = ErrorResponse::new(error.message, error.code.as_str());
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }

    tracing::error!(code = %error.code, error = %error.message, "Request failed");
    let body = ErrorResponse::new("Internal server error", error.code.as_str());
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
