//! Diagram domain: the sensor/PLC graph a user draws and the rules that
//! reconcile stored associations with it.

mod catalog;
mod events;
mod graph;
mod reconciliation;

pub use catalog::{Plc, PortKey, Sensor, SensorPlcConnection, UserPlc, UserSensor};
pub use events::DiagramSubmitted;
pub use graph::{
    AcceptedDiagram, AcceptedSensor, DiagramSubmission, PlcDescriptor, PlcPort, SensorDescriptor,
};
pub use reconciliation::{
    group_by, resolve_connections, stale_connections, stale_rows, DanglingConnection,
    DanglingReason, ResolvedConnections,
};
