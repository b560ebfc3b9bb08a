//! Storage settings.
//!
//! Without a URL the binary keeps all state in memory.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_POOL_SIZE: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `postgres://` URL; blank counts as unset.
    pub url: Option<String>,
    pub pool: PoolConfig,
    /// Apply `migrations/` before serving.
    pub run_migrations: bool,
}

/// Connection pool sizing, in connections and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub min: u32,
    pub max: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min: 2,
            max: 10,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PoolConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl DatabaseConfig {
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let url_ok = self
            .url()
            .map_or(true, |u| u.starts_with("postgres://") || u.starts_with("postgresql://"));
        if !url_ok {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.pool.min > self.pool.max {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.pool.max > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}
