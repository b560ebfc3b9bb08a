//! Place state and history held in memory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, PlaceKey};
use crate::domain::place::{Place, PlaceHistory};
use crate::ports::{PlaceHistoryRepository, PlaceRepository};

#[derive(Debug, Clone, Default)]
pub struct InMemoryPlaceRepository {
    places: Arc<RwLock<HashMap<PlaceKey, Place>>>,
}

impl InMemoryPlaceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.places.read().await.len()
    }
}

#[async_trait]
impl PlaceRepository for InMemoryPlaceRepository {
    async fn find(&self, key: &PlaceKey) -> Result<Option<Place>, DomainError> {
        Ok(self.places.read().await.get(key).cloned())
    }

    async fn find_many(&self, keys: &[PlaceKey]) -> Result<Vec<Place>, DomainError> {
        let store = self.places.read().await;
        Ok(keys.iter().filter_map(|k| store.get(k).cloned()).collect())
    }

    async fn find_all(&self) -> Result<Vec<Place>, DomainError> {
        let store = self.places.read().await;
        let mut all: Vec<Place> = store.values().cloned().collect();
        all.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(all)
    }

    async fn insert_if_absent(&self, place: Place) -> Result<bool, DomainError> {
        let mut store = self.places.write().await;
        if store.contains_key(&place.key) {
            return Ok(false);
        }
        store.insert(place.key.clone(), place);
        Ok(true)
    }

    async fn upsert_all(&self, places: &[Place]) -> Result<(), DomainError> {
        let mut store = self.places.write().await;
        for place in places {
            store.insert(place.key.clone(), place.clone());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPlaceHistoryRepository {
    rows: Arc<RwLock<HashMap<PlaceKey, Vec<PlaceHistory>>>>,
}

impl InMemoryPlaceHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, place: &PlaceKey) -> usize {
        self.rows.read().await.get(place).map(Vec::len).unwrap_or(0)
    }
}

#[async_trait]
impl PlaceHistoryRepository for InMemoryPlaceHistoryRepository {
    async fn append_all(&self, rows: &[PlaceHistory]) -> Result<(), DomainError> {
        let mut store = self.rows.write().await;
        for row in rows {
            store.entry(row.place.clone()).or_default().push(row.clone());
        }
        Ok(())
    }

    async fn temperatures(&self, place: &PlaceKey) -> Result<Vec<Option<f64>>, DomainError> {
        let store = self.rows.read().await;
        Ok(store
            .get(place)
            .map(|rows| rows.iter().map(|r| r.temperature).collect())
            .unwrap_or_default())
    }

    async fn find_latest(
        &self,
        place: &PlaceKey,
        limit: usize,
    ) -> Result<Vec<PlaceHistory>, DomainError> {
        let store = self.rows.read().await;
        let mut rows = store.get(place).cloned().unwrap_or_default();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        rows.truncate(limit);
        Ok(rows)
    }
}
