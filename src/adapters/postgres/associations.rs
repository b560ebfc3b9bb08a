//! PostgreSQL implementation of user associations and wiring edges.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::diagram::{SensorPlcConnection, UserPlc, UserSensor};
use crate::domain::foundation::{DomainError, PlcId, SensorId, UserId};
use crate::ports::{SensorPlcRepository, UserPlcRepository, UserSensorRepository};

use super::db_error;

#[derive(Clone)]
pub struct PostgresUserSensorRepository {
    pool: PgPool,
}

impl PostgresUserSensorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserSensorRepository for PostgresUserSensorRepository {
    async fn upsert_all(&self, rows: &[UserSensor]) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin user sensor upsert", e))?;

        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO user_sensors (user_id, sensor_id) VALUES ($1, $2)
                ON CONFLICT (user_id, sensor_id) DO NOTHING
                "#,
            )
            .bind(row.user_id.as_str())
            .bind(row.sensor_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("upsert user sensor", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("commit user sensor upsert", e))
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<UserSensor>, DomainError> {
        let rows = sqlx::query(
            "SELECT user_id, sensor_id FROM user_sensors WHERE user_id = $1 ORDER BY sensor_id",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch user sensors", e))?;

        rows.into_iter().map(row_to_user_sensor).collect()
    }

    async fn find_by_sensor_ids(&self, ids: &[SensorId]) -> Result<Vec<UserSensor>, DomainError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query(
            r#"
            SELECT user_id, sensor_id FROM user_sensors
            WHERE sensor_id = ANY($1)
            ORDER BY user_id, sensor_id
            "#,
        )
        .bind(uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch sensor subscribers", e))?;

        rows.into_iter().map(row_to_user_sensor).collect()
    }

    async fn delete_all(&self, rows: &[UserSensor]) -> Result<(), DomainError> {
        for row in rows {
            sqlx::query("DELETE FROM user_sensors WHERE user_id = $1 AND sensor_id = $2")
                .bind(row.user_id.as_str())
                .bind(row.sensor_id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("delete user sensor", e))?;
        }
        Ok(())
    }
}

fn row_to_user_sensor(row: sqlx::postgres::PgRow) -> Result<UserSensor, DomainError> {
    let user_id: String = row.try_get("user_id").map_err(|e| db_error("read user_id", e))?;
    let sensor_id: Uuid = row
        .try_get("sensor_id")
        .map_err(|e| db_error("read sensor_id", e))?;

    Ok(UserSensor::new(
        UserId::new(user_id)?,
        SensorId::from_uuid(sensor_id),
    ))
}

#[derive(Clone)]
pub struct PostgresUserPlcRepository {
    pool: PgPool,
}

impl PostgresUserPlcRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserPlcRepository for PostgresUserPlcRepository {
    async fn upsert_all(&self, rows: &[UserPlc]) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin user PLC upsert", e))?;

        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO user_plcs (user_id, plc_id) VALUES ($1, $2)
                ON CONFLICT (user_id, plc_id) DO NOTHING
                "#,
            )
            .bind(row.user_id.as_str())
            .bind(row.plc_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("upsert user PLC", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("commit user PLC upsert", e))
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<UserPlc>, DomainError> {
        let rows =
            sqlx::query("SELECT user_id, plc_id FROM user_plcs WHERE user_id = $1 ORDER BY plc_id")
                .bind(user_id.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("fetch user PLCs", e))?;

        rows.into_iter()
            .map(|row| {
                let user_id: String =
                    row.try_get("user_id").map_err(|e| db_error("read user_id", e))?;
                let plc_id: Uuid = row.try_get("plc_id").map_err(|e| db_error("read plc_id", e))?;
                Ok(UserPlc::new(UserId::new(user_id)?, PlcId::from_uuid(plc_id)))
            })
            .collect()
    }

    async fn delete_all(&self, rows: &[UserPlc]) -> Result<(), DomainError> {
        for row in rows {
            sqlx::query("DELETE FROM user_plcs WHERE user_id = $1 AND plc_id = $2")
                .bind(row.user_id.as_str())
                .bind(row.plc_id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("delete user PLC", e))?;
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct PostgresSensorPlcRepository {
    pool: PgPool,
}

impl PostgresSensorPlcRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SensorPlcRepository for PostgresSensorPlcRepository {
    async fn upsert_all(&self, rows: &[SensorPlcConnection]) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin connection upsert", e))?;

        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO sensor_plc_connections (plc_id, port, sensor_id, owner_id)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (plc_id, port) DO UPDATE SET
                    sensor_id = EXCLUDED.sensor_id,
                    owner_id = EXCLUDED.owner_id
                "#,
            )
            .bind(row.plc_id.as_uuid())
            .bind(row.port)
            .bind(row.sensor_id.as_uuid())
            .bind(row.owner.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("upsert connection", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("commit connection upsert", e))
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<SensorPlcConnection>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT plc_id, port, sensor_id, owner_id FROM sensor_plc_connections
            WHERE owner_id = $1
            ORDER BY plc_id, port
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch connections", e))?;

        rows.into_iter()
            .map(|row| {
                let plc_id: Uuid = row.try_get("plc_id").map_err(|e| db_error("read plc_id", e))?;
                let port: i32 = row.try_get("port").map_err(|e| db_error("read port", e))?;
                let sensor_id: Uuid = row
                    .try_get("sensor_id")
                    .map_err(|e| db_error("read sensor_id", e))?;
                let owner_id: String = row
                    .try_get("owner_id")
                    .map_err(|e| db_error("read owner_id", e))?;

                Ok(SensorPlcConnection::new(
                    SensorId::from_uuid(sensor_id),
                    PlcId::from_uuid(plc_id),
                    port,
                    UserId::new(owner_id)?,
                ))
            })
            .collect()
    }

    async fn delete_all(&self, rows: &[SensorPlcConnection]) -> Result<(), DomainError> {
        for row in rows {
            sqlx::query(
                "DELETE FROM sensor_plc_connections WHERE plc_id = $1 AND port = $2 AND owner_id = $3",
            )
            .bind(row.plc_id.as_uuid())
            .bind(row.port)
            .bind(row.owner.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete connection", e))?;
        }
        Ok(())
    }
}
