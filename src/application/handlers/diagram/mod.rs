//! Diagram handlers - reconciliation of submitted sensor/PLC graphs.

mod diagram_submitted;
mod reconcile_diagram;

pub use diagram_submitted::DiagramSubmittedHandler;
pub use reconcile_diagram::{DiagramStores, ReconcileDiagramCommand, ReconcileDiagramHandler};
