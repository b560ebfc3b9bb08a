//! In-memory repository adapters.
//!
//! Backed by `tokio::sync::RwLock` maps. Used by the test suites and by the
//! binary when no database URL is configured.

mod associations;
mod catalog;
mod places;

pub use associations::{
    InMemorySensorPlcRepository, InMemoryUserPlcRepository, InMemoryUserSensorRepository,
};
pub use catalog::{InMemoryPlcRepository, InMemorySensorRepository};
pub use places::{InMemoryPlaceHistoryRepository, InMemoryPlaceRepository};
