//! Application handlers.
//!
//! Command and event handlers that orchestrate domain operations.
//!
//! ```text
//! diagram.submitted ─> Reconciler ─┬─> place.history_requested ─┐
//!                                  └─> place.weather_requested ─┤
//! places.refresh_requested ────────────────────────────────────┴─> WeatherOrchestrator
//!                                                                      │
//!                 places.enriched / place.history_ready <──────────────┘
//!                                      │
//!                               PlaceAggregator ─> places.updated ─> UpdateDistributor
//!                                                                      │
//!                                          sensors.updated_for_user <──┘
//! ```

pub mod diagram;
pub mod distribution;
pub mod place;
pub mod weather;

pub use diagram::{
    DiagramStores, DiagramSubmittedHandler, ReconcileDiagramCommand, ReconcileDiagramHandler,
};
pub use distribution::{DistributionStores, UpdateDistributor};
pub use place::PlaceAggregator;
pub use weather::{WeatherOrchestrator, DEFAULT_HISTORY_SAMPLES};
