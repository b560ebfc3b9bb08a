//! Background scheduler configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Publish the hourly weather refresh
    #[serde(default = "default_true")]
    pub refresh_enabled: bool,

    /// Time between purges of expired blacklist entries
    #[serde(default = "default_purge_interval")]
    pub blacklist_purge_interval_secs: u64,
}

impl SchedulerConfig {
    pub fn blacklist_purge_interval(&self) -> Duration {
        Duration::from_secs(self.blacklist_purge_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.blacklist_purge_interval_secs == 0 {
            return Err(ValidationError::ZeroDuration(
                "scheduler.blacklist_purge_interval_secs",
            ));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_enabled: true,
            blacklist_purge_interval_secs: default_purge_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_purge_interval() -> u64 {
    3600
}
