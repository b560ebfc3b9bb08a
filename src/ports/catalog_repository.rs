//! Repository ports for the shared sensor and PLC catalog.
//!
//! The catalog is global: the same sensor id submitted by two users refers
//! to one row, and the last upsert wins.

use async_trait::async_trait;

use crate::domain::diagram::{Plc, Sensor};
use crate::domain::foundation::{DomainError, PlaceKey, SensorId};

#[async_trait]
pub trait SensorRepository: Send + Sync {
    /// Insert or update every sensor by id.
    async fn upsert_all(&self, sensors: &[Sensor]) -> Result<(), DomainError>;

    /// Sensors with the given ids; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[SensorId]) -> Result<Vec<Sensor>, DomainError>;

    /// Sensors located at a place.
    async fn find_by_place(&self, place: &PlaceKey) -> Result<Vec<Sensor>, DomainError>;
}

#[async_trait]
pub trait PlcRepository: Send + Sync {
    /// Insert or update every PLC by id.
    async fn upsert_all(&self, plcs: &[Plc]) -> Result<(), DomainError>;
}
