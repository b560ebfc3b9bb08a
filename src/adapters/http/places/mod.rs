//! HTTP adapter for place history.

mod handlers;
mod routes;

pub use handlers::{get_place_history, PlaceHandlers, HISTORY_LIMIT};
pub use routes::place_routes;
