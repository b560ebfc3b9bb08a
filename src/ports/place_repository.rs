//! Repository ports for place state and place history.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlaceKey};
use crate::domain::place::{Place, PlaceHistory};

#[async_trait]
pub trait PlaceRepository: Send + Sync {
    async fn find(&self, key: &PlaceKey) -> Result<Option<Place>, DomainError>;

    /// Places for the given keys; unknown keys are skipped.
    async fn find_many(&self, keys: &[PlaceKey]) -> Result<Vec<Place>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Place>, DomainError>;

    /// Stores `place` unless its key exists. Returns true when it was created.
    async fn insert_if_absent(&self, place: Place) -> Result<bool, DomainError>;

    /// Insert or replace every place by key.
    async fn upsert_all(&self, places: &[Place]) -> Result<(), DomainError>;
}

/// Append-only store of temperature samples.
#[async_trait]
pub trait PlaceHistoryRepository: Send + Sync {
    async fn append_all(&self, rows: &[PlaceHistory]) -> Result<(), DomainError>;

    /// Every recorded temperature of a place, in insertion order.
    async fn temperatures(&self, place: &PlaceKey) -> Result<Vec<Option<f64>>, DomainError>;

    /// The `limit` most recent rows of a place, newest first.
    async fn find_latest(&self, place: &PlaceKey, limit: usize)
        -> Result<Vec<PlaceHistory>, DomainError>;
}
