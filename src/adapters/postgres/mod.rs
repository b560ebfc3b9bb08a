//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresSensorRepository`, `PostgresPlcRepository` - Shared catalog
//! - `PostgresUserSensorRepository`, `PostgresUserPlcRepository`,
//!   `PostgresSensorPlcRepository` - Diagram associations
//! - `PostgresPlaceRepository`, `PostgresPlaceHistoryRepository` - Weather state
//! - `PostgresTokenBlacklist` - Revoked credentials

mod associations;
mod catalog;
mod places;
mod token_blacklist;

pub use associations::{
    PostgresSensorPlcRepository, PostgresUserPlcRepository, PostgresUserSensorRepository,
};
pub use catalog::{PostgresPlcRepository, PostgresSensorRepository};
pub use places::{PostgresPlaceHistoryRepository, PostgresPlaceRepository};
pub use token_blacklist::PostgresTokenBlacklist;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Opens a connection pool sized by the database configuration.
pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .min_connections(config.pool.min)
        .max_connections(config.pool.max)
        .acquire_timeout(config.pool.acquire_timeout())
        .idle_timeout(config.pool.idle_timeout())
        .connect(url)
        .await
        .map_err(|e| db_error("connect to database", e))
}

/// Applies the schema under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to run migrations: {}", e),
            )
        })
}

pub(crate) fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", action, e),
    )
}
