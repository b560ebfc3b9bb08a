//! User association rows and wiring edges held in memory.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::diagram::{PortKey, SensorPlcConnection, UserPlc, UserSensor};
use crate::domain::foundation::{DomainError, PlcId, SensorId, UserId};
use crate::ports::{SensorPlcRepository, UserPlcRepository, UserSensorRepository};

/// Rows unique by `(user, sensor)`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserSensorRepository {
    rows: Arc<RwLock<BTreeMap<(UserId, SensorId), UserSensor>>>,
}

impl InMemoryUserSensorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<UserSensor> {
        self.rows.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl UserSensorRepository for InMemoryUserSensorRepository {
    async fn upsert_all(&self, rows: &[UserSensor]) -> Result<(), DomainError> {
        let mut store = self.rows.write().await;
        for row in rows {
            store.insert(row.key(), row.clone());
        }
        Ok(())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<UserSensor>, DomainError> {
        let store = self.rows.read().await;
        Ok(store
            .values()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_sensor_ids(&self, ids: &[SensorId]) -> Result<Vec<UserSensor>, DomainError> {
        let wanted: HashSet<&SensorId> = ids.iter().collect();
        let store = self.rows.read().await;
        Ok(store
            .values()
            .filter(|r| wanted.contains(&r.sensor_id))
            .cloned()
            .collect())
    }

    async fn delete_all(&self, rows: &[UserSensor]) -> Result<(), DomainError> {
        let mut store = self.rows.write().await;
        for row in rows {
            store.remove(&row.key());
        }
        Ok(())
    }
}

/// Rows unique by `(user, plc)`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserPlcRepository {
    rows: Arc<RwLock<BTreeMap<(UserId, PlcId), UserPlc>>>,
}

impl InMemoryUserPlcRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<UserPlc> {
        self.rows.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl UserPlcRepository for InMemoryUserPlcRepository {
    async fn upsert_all(&self, rows: &[UserPlc]) -> Result<(), DomainError> {
        let mut store = self.rows.write().await;
        for row in rows {
            store.insert(row.key(), row.clone());
        }
        Ok(())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<UserPlc>, DomainError> {
        let store = self.rows.read().await;
        Ok(store
            .values()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_all(&self, rows: &[UserPlc]) -> Result<(), DomainError> {
        let mut store = self.rows.write().await;
        for row in rows {
            store.remove(&row.key());
        }
        Ok(())
    }
}

/// Wiring edges unique by `(plc, port)`.
#[derive(Debug, Clone, Default)]
pub struct InMemorySensorPlcRepository {
    edges: Arc<RwLock<BTreeMap<PortKey, SensorPlcConnection>>>,
}

impl InMemorySensorPlcRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<SensorPlcConnection> {
        self.edges.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl SensorPlcRepository for InMemorySensorPlcRepository {
    async fn upsert_all(&self, rows: &[SensorPlcConnection]) -> Result<(), DomainError> {
        let mut store = self.edges.write().await;
        for row in rows {
            store.insert(row.port_key(), row.clone());
        }
        Ok(())
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<SensorPlcConnection>, DomainError> {
        let store = self.edges.read().await;
        Ok(store
            .values()
            .filter(|e| &e.owner == owner)
            .cloned()
            .collect())
    }

    async fn delete_all(&self, rows: &[SensorPlcConnection]) -> Result<(), DomainError> {
        let mut store = self.edges.write().await;
        for row in rows {
            // Another owner may have claimed the slot since the row was read
            if store.get(&row.port_key()).map(|e| &e.owner) == Some(&row.owner) {
                store.remove(&row.port_key());
            }
        }
        Ok(())
    }
}
