//! Catalog entities and the association rows that tie them to users.
//!
//! Sensors and PLCs live in a global catalog shared by every user who draws
//! them. Ownership is expressed only through association rows.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlaceKey, PlcId, SensorId, UserId};

/// A logical temperature-reading point assigned to a place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    pub place: PlaceKey,
}

impl Sensor {
    pub fn new(id: SensorId, place: PlaceKey) -> Self {
        Self { id, place }
    }
}

/// A controller node that sensors are wired to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plc {
    pub id: PlcId,
    pub name: String,
}

impl Plc {
    pub fn new(id: PlcId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Association between a user and a sensor, unique by `(user_id, sensor_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserSensor {
    pub user_id: UserId,
    pub sensor_id: SensorId,
}

impl UserSensor {
    pub fn new(user_id: UserId, sensor_id: SensorId) -> Self {
        Self { user_id, sensor_id }
    }

    pub fn key(&self) -> (UserId, SensorId) {
        (self.user_id.clone(), self.sensor_id)
    }
}

/// Association between a user and a PLC, unique by `(user_id, plc_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserPlc {
    pub user_id: UserId,
    pub plc_id: PlcId,
}

impl UserPlc {
    pub fn new(user_id: UserId, plc_id: PlcId) -> Self {
        Self { user_id, plc_id }
    }

    pub fn key(&self) -> (UserId, PlcId) {
        (self.user_id.clone(), self.plc_id)
    }
}

/// A PLC port slot. Only one sensor can occupy it at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortKey {
    pub plc_id: PlcId,
    pub port: i32,
}

/// A wiring edge from a sensor to a numbered PLC port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorPlcConnection {
    pub sensor_id: SensorId,
    pub plc_id: PlcId,
    pub port: i32,
    pub owner: UserId,
}

impl SensorPlcConnection {
    pub fn new(sensor_id: SensorId, plc_id: PlcId, port: i32, owner: UserId) -> Self {
        Self {
            sensor_id,
            plc_id,
            port,
            owner,
        }
    }

    pub fn port_key(&self) -> PortKey {
        PortKey {
            plc_id: self.plc_id,
            port: self.port,
        }
    }
}
