//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events
//!
//! ## Persistence Ports
//!
//! - `SensorRepository`, `PlcRepository` - Shared catalog
//! - `UserSensorRepository`, `UserPlcRepository`, `SensorPlcRepository` - Associations
//! - `PlaceRepository`, `PlaceHistoryRepository` - Place state and samples
//! - `TokenBlacklist` - Revoked credentials
//!
//! ## External Services
//!
//! - `WeatherProvider` - Current and historical weather lookups
//! - `SessionValidator` - Bearer credential validation
//! - `LiveConnection` - One open client connection

mod association_repository;
mod catalog_repository;
mod event_publisher;
mod event_subscriber;
mod live_connection;
mod place_repository;
mod session_validator;
mod token_blacklist;
mod weather_provider;

pub use association_repository::{SensorPlcRepository, UserPlcRepository, UserSensorRepository};
pub use catalog_repository::{PlcRepository, SensorRepository};
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventHandler, EventSubscriber};
pub use live_connection::{LiveConnection, TransportError};
pub use place_repository::{PlaceHistoryRepository, PlaceRepository};
pub use session_validator::SessionValidator;
pub use token_blacklist::TokenBlacklist;
pub use weather_provider::{WeatherError, WeatherProvider};
