//! Shared sensor and PLC catalog held in memory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::diagram::{Plc, Sensor};
use crate::domain::foundation::{DomainError, PlaceKey, PlcId, SensorId};
use crate::ports::{PlcRepository, SensorRepository};

#[derive(Debug, Clone, Default)]
pub struct InMemorySensorRepository {
    sensors: Arc<RwLock<HashMap<SensorId, Sensor>>>,
}

impl InMemorySensorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.sensors.read().await.len()
    }

    pub async fn get(&self, id: &SensorId) -> Option<Sensor> {
        self.sensors.read().await.get(id).cloned()
    }
}

#[async_trait]
impl SensorRepository for InMemorySensorRepository {
    async fn upsert_all(&self, sensors: &[Sensor]) -> Result<(), DomainError> {
        let mut store = self.sensors.write().await;
        for sensor in sensors {
            store.insert(sensor.id, sensor.clone());
        }
        Ok(())
    }

    async fn find_by_ids(&self, ids: &[SensorId]) -> Result<Vec<Sensor>, DomainError> {
        let store = self.sensors.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }

    async fn find_by_place(&self, place: &PlaceKey) -> Result<Vec<Sensor>, DomainError> {
        let store = self.sensors.read().await;
        let mut found: Vec<Sensor> = store
            .values()
            .filter(|s| &s.place == place)
            .cloned()
            .collect();
        found.sort_by_key(|s| s.id);
        Ok(found)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPlcRepository {
    plcs: Arc<RwLock<HashMap<PlcId, Plc>>>,
}

impl InMemoryPlcRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &PlcId) -> Option<Plc> {
        self.plcs.read().await.get(id).cloned()
    }
}

#[async_trait]
impl PlcRepository for InMemoryPlcRepository {
    async fn upsert_all(&self, plcs: &[Plc]) -> Result<(), DomainError> {
        let mut store = self.plcs.write().await;
        for plc in plcs {
            store.insert(plc.id, plc.clone());
        }
        Ok(())
    }
}
