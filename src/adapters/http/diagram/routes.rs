//! HTTP routes for diagram endpoints.

use axum::{routing::put, Router};

use super::handlers::{put_diagram, DiagramHandlers};

/// Creates the diagram router.
pub fn diagram_routes(handlers: DiagramHandlers) -> Router {
    Router::new()
        .route("/api/diagram", put(put_diagram))
        .with_state(handlers)
}
