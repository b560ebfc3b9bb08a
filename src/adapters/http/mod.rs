//! HTTP adapters - REST routes and the application router.
//!
//! | Route | Auth | Purpose |
//! |-------|------|---------|
//! | `PUT /api/diagram` | cookie | Store a diagram, echo the accepted graph |
//! | `GET /api/places/:key/history` | cookie | Latest history rows of a place |
//! | `GET /ws/diagram` | `jwt` handshake cookie | Live sensor updates |
//! | `GET /health` | none | Liveness check |

pub mod diagram;
pub mod error;
pub mod middleware;
pub mod places;

pub use diagram::{diagram_routes, DiagramHandlers};
pub use error::{handle_domain_error, ErrorResponse};
pub use middleware::{cookie_auth_middleware, CookieAuth, RequireAuth};
pub use places::{place_routes, PlaceHandlers};

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::{live_router, LiveSocketState};

/// Everything the application router needs.
#[derive(Clone)]
pub struct HttpState {
    pub diagram: DiagramHandlers,
    pub places: PlaceHandlers,
    pub auth: CookieAuth,
    pub live: LiveSocketState,
}

/// Builds the full router: REST routes behind cookie auth, the live socket
/// and the health check, all traced.
pub fn app_router(state: HttpState) -> Router {
    let api = diagram_routes(state.diagram)
        .merge(place_routes(state.places))
        .layer(from_fn_with_state(state.auth, cookie_auth_middleware));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .merge(live_router().with_state(state.live))
        .layer(TraceLayer::new_for_http())
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
