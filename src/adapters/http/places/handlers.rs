//! HTTP handlers for place endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{handle_domain_error, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::domain::foundation::PlaceKey;
use crate::ports::PlaceHistoryRepository;

/// Rows returned by the history endpoint.
pub const HISTORY_LIMIT: usize = 10;

#[derive(Clone)]
pub struct PlaceHandlers {
    history: Arc<dyn PlaceHistoryRepository>,
}

impl PlaceHandlers {
    pub fn new(history: Arc<dyn PlaceHistoryRepository>) -> Self {
        Self { history }
    }
}

/// GET /api/places/:key/history - Latest history rows of a place, newest first
pub async fn get_place_history(
    State(handlers): State<PlaceHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(key): Path<String>,
) -> Response {
    let place = PlaceKey::new(key);
    if place.is_blank() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid place")),
        )
            .into_response();
    }

    match handlers.history.find_latest(&place, HISTORY_LIMIT).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => handle_domain_error(e),
    }
}
