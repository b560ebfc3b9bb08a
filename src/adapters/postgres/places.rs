//! PostgreSQL implementation of place state and history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, PlaceKey, Timestamp};
use crate::domain::place::{Place, PlaceHistory};
use crate::ports::{PlaceHistoryRepository, PlaceRepository};

use super::db_error;

const PLACE_COLUMNS: &str =
    "key, temperature, average_temperature, condition, continent, updated_at";

#[derive(Clone)]
pub struct PostgresPlaceRepository {
    pool: PgPool,
}

impl PostgresPlaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceRepository for PostgresPlaceRepository {
    async fn find(&self, key: &PlaceKey) -> Result<Option<Place>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM places WHERE key = $1", PLACE_COLUMNS))
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch place", e))?;

        row.map(row_to_place).transpose()
    }

    async fn find_many(&self, keys: &[PlaceKey]) -> Result<Vec<Place>, DomainError> {
        let keys: Vec<String> = keys.iter().map(|k| k.as_str().to_string()).collect();
        let rows = sqlx::query(&format!(
            "SELECT {} FROM places WHERE key = ANY($1) ORDER BY key",
            PLACE_COLUMNS
        ))
        .bind(keys)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch places", e))?;

        rows.into_iter().map(row_to_place).collect()
    }

    async fn find_all(&self) -> Result<Vec<Place>, DomainError> {
        let rows = sqlx::query(&format!("SELECT {} FROM places ORDER BY key", PLACE_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("fetch all places", e))?;

        rows.into_iter().map(row_to_place).collect()
    }

    async fn insert_if_absent(&self, place: Place) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO places (key, temperature, average_temperature, condition, continent, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(place.key.as_str())
        .bind(place.temperature)
        .bind(place.average_temperature)
        .bind(&place.condition)
        .bind(&place.continent)
        .bind(place.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("insert place", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn upsert_all(&self, places: &[Place]) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin place upsert", e))?;

        for place in places {
            sqlx::query(
                r#"
                INSERT INTO places (key, temperature, average_temperature, condition, continent, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (key) DO UPDATE SET
                    temperature = EXCLUDED.temperature,
                    average_temperature = EXCLUDED.average_temperature,
                    condition = EXCLUDED.condition,
                    continent = EXCLUDED.continent,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(place.key.as_str())
            .bind(place.temperature)
            .bind(place.average_temperature)
            .bind(&place.condition)
            .bind(&place.continent)
            .bind(place.updated_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("upsert place", e))?;
        }

        tx.commit().await.map_err(|e| db_error("commit place upsert", e))
    }
}

fn row_to_place(row: sqlx::postgres::PgRow) -> Result<Place, DomainError> {
    let key: String = row.try_get("key").map_err(|e| db_error("read key", e))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| db_error("read updated_at", e))?;

    Ok(Place {
        key: PlaceKey::new(key),
        temperature: row
            .try_get("temperature")
            .map_err(|e| db_error("read temperature", e))?,
        average_temperature: row
            .try_get("average_temperature")
            .map_err(|e| db_error("read average_temperature", e))?,
        condition: row
            .try_get("condition")
            .map_err(|e| db_error("read condition", e))?,
        continent: row
            .try_get("continent")
            .map_err(|e| db_error("read continent", e))?,
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

#[derive(Clone)]
pub struct PostgresPlaceHistoryRepository {
    pool: PgPool,
}

impl PostgresPlaceHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceHistoryRepository for PostgresPlaceHistoryRepository {
    async fn append_all(&self, rows: &[PlaceHistory]) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin history append", e))?;

        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO place_history (place, temperature, condition, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(row.place.as_str())
            .bind(row.temperature)
            .bind(&row.condition)
            .bind(row.created_at.as_datetime())
            .bind(row.updated_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("append history", e))?;
        }

        tx.commit().await.map_err(|e| db_error("commit history append", e))
    }

    async fn temperatures(&self, place: &PlaceKey) -> Result<Vec<Option<f64>>, DomainError> {
        let rows: Vec<(Option<f64>,)> =
            sqlx::query_as("SELECT temperature FROM place_history WHERE place = $1")
                .bind(place.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("fetch history temperatures", e))?;

        Ok(rows.into_iter().map(|(t,)| t).collect())
    }

    async fn find_latest(
        &self,
        place: &PlaceKey,
        limit: usize,
    ) -> Result<Vec<PlaceHistory>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT place, temperature, condition, created_at, updated_at
            FROM place_history
            WHERE place = $1
            ORDER BY updated_at DESC
            LIMIT $2
            "#,
        )
        .bind(place.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch latest history", e))?;

        rows.into_iter()
            .map(|row| {
                let place: String = row.try_get("place").map_err(|e| db_error("read place", e))?;
                let created_at: DateTime<Utc> = row
                    .try_get("created_at")
                    .map_err(|e| db_error("read created_at", e))?;
                let updated_at: DateTime<Utc> = row
                    .try_get("updated_at")
                    .map_err(|e| db_error("read updated_at", e))?;

                Ok(PlaceHistory {
                    place: PlaceKey::new(place),
                    temperature: row
                        .try_get("temperature")
                        .map_err(|e| db_error("read temperature", e))?,
                    condition: row
                        .try_get("condition")
                        .map_err(|e| db_error("read condition", e))?,
                    created_at: Timestamp::from_datetime(created_at),
                    updated_at: Timestamp::from_datetime(updated_at),
                })
            })
            .collect()
    }
}
