//! HTTP adapter for diagram submission.

mod handlers;
mod routes;

pub use handlers::{put_diagram, DiagramHandlers};
pub use routes::diagram_routes;
