//! PostgreSQL implementation of the token blacklist.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::adapters::auth::token_digest;
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::TokenBlacklist;

use super::db_error;

#[derive(Clone)]
pub struct PostgresTokenBlacklist {
    pool: PgPool,
}

impl PostgresTokenBlacklist {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenBlacklist for PostgresTokenBlacklist {
    async fn is_revoked(&self, token: &str) -> Result<bool, DomainError> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM token_blacklist WHERE token_digest = $1")
                .bind(token_digest(token))
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("check token blacklist", e))?;

        Ok(result.0 > 0)
    }

    async fn revoke(&self, token: &str, expires_at: Timestamp) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO token_blacklist (token_digest, expires_at) VALUES ($1, $2)
            ON CONFLICT (token_digest) DO UPDATE SET expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(token_digest(token))
        .bind(expires_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("revoke token", e))?;

        Ok(())
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM token_blacklist WHERE expires_at < $1")
            .bind(now.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("purge token blacklist", e))?;

        Ok(result.rows_affected() as usize)
    }
}
