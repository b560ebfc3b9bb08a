//! PostgreSQL implementation of the sensor and PLC catalog.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::diagram::{Plc, Sensor};
use crate::domain::foundation::{DomainError, PlaceKey, SensorId};
use crate::ports::{PlcRepository, SensorRepository};

use super::db_error;

#[derive(Clone)]
pub struct PostgresSensorRepository {
    pool: PgPool,
}

impl PostgresSensorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SensorRepository for PostgresSensorRepository {
    async fn upsert_all(&self, sensors: &[Sensor]) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin sensor upsert", e))?;

        for sensor in sensors {
            sqlx::query(
                r#"
                INSERT INTO sensors (id, place) VALUES ($1, $2)
                ON CONFLICT (id) DO UPDATE SET place = EXCLUDED.place
                "#,
            )
            .bind(sensor.id.as_uuid())
            .bind(sensor.place.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("upsert sensor", e))?;
        }

        tx.commit().await.map_err(|e| db_error("commit sensor upsert", e))
    }

    async fn find_by_ids(&self, ids: &[SensorId]) -> Result<Vec<Sensor>, DomainError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query("SELECT id, place FROM sensors WHERE id = ANY($1)")
            .bind(uuids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("fetch sensors", e))?;

        rows.into_iter().map(row_to_sensor).collect()
    }

    async fn find_by_place(&self, place: &PlaceKey) -> Result<Vec<Sensor>, DomainError> {
        let rows = sqlx::query("SELECT id, place FROM sensors WHERE place = $1 ORDER BY id")
            .bind(place.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("fetch sensors by place", e))?;

        rows.into_iter().map(row_to_sensor).collect()
    }
}

fn row_to_sensor(row: sqlx::postgres::PgRow) -> Result<Sensor, DomainError> {
    let id: Uuid = row.try_get("id").map_err(|e| db_error("read sensor id", e))?;
    let place: String = row
        .try_get("place")
        .map_err(|e| db_error("read sensor place", e))?;

    Ok(Sensor::new(SensorId::from_uuid(id), PlaceKey::new(place)))
}

#[derive(Clone)]
pub struct PostgresPlcRepository {
    pool: PgPool,
}

impl PostgresPlcRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlcRepository for PostgresPlcRepository {
    async fn upsert_all(&self, plcs: &[Plc]) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin PLC upsert", e))?;

        for plc in plcs {
            sqlx::query(
                r#"
                INSERT INTO plcs (id, name) VALUES ($1, $2)
                ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
                "#,
            )
            .bind(plc.id.as_uuid())
            .bind(&plc.name)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("upsert PLC", e))?;
        }

        tx.commit().await.map_err(|e| db_error("commit PLC upsert", e))
    }
}
