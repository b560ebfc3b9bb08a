//! HTTP routes for place endpoints.

use axum::{routing::get, Router};

use super::handlers::{get_place_history, PlaceHandlers};

/// Creates the place router.
pub fn place_routes(handlers: PlaceHandlers) -> Router {
    Router::new()
        .route("/api/places/:key/history", get(get_place_history))
        .with_state(handlers)
}
