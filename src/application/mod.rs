//! Application layer - handlers, live sessions and background services.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers are wired to the event bus in the binary; background services
//! run alongside the HTTP server until shutdown.

pub mod background;
pub mod handlers;
pub mod live;

pub use background::{
    BlacklistPurgeConfig, BlacklistPurgeService, HeartbeatConfig, HeartbeatService,
    WeatherRefreshService,
};
pub use handlers::{
    DiagramStores, DiagramSubmittedHandler, DistributionStores, PlaceAggregator,
    ReconcileDiagramCommand, ReconcileDiagramHandler, UpdateDistributor, WeatherOrchestrator,
};
pub use live::{Delivery, LiveSession, LiveSessionRegistry, SessionGate, SweepReport};
