//! Repository ports for the rows that associate users with catalog entries.
//!
//! Upserts are idempotent on each row's unique key, so a retried
//! reconciliation never duplicates rows.

use async_trait::async_trait;

use crate::domain::diagram::{SensorPlcConnection, UserPlc, UserSensor};
use crate::domain::foundation::{DomainError, SensorId, UserId};

/// Rows unique by `(user_id, sensor_id)`.
#[async_trait]
pub trait UserSensorRepository: Send + Sync {
    async fn upsert_all(&self, rows: &[UserSensor]) -> Result<(), DomainError>;

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<UserSensor>, DomainError>;

    async fn find_by_sensor_ids(&self, ids: &[SensorId]) -> Result<Vec<UserSensor>, DomainError>;

    async fn delete_all(&self, rows: &[UserSensor]) -> Result<(), DomainError>;
}

/// Rows unique by `(user_id, plc_id)`.
#[async_trait]
pub trait UserPlcRepository: Send + Sync {
    async fn upsert_all(&self, rows: &[UserPlc]) -> Result<(), DomainError>;

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<UserPlc>, DomainError>;

    async fn delete_all(&self, rows: &[UserPlc]) -> Result<(), DomainError>;
}

/// Wiring edges unique by `(plc_id, port)`; upserting an occupied slot
/// replaces its sensor and owner.
#[async_trait]
pub trait SensorPlcRepository: Send + Sync {
    async fn upsert_all(&self, rows: &[SensorPlcConnection]) -> Result<(), DomainError>;

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<SensorPlcConnection>, DomainError>;

    /// Deletes the edges occupying the given rows' port slots.
    async fn delete_all(&self, rows: &[SensorPlcConnection]) -> Result<(), DomainError>;
}
