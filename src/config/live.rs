//! Live session configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::live::SupersedePolicy;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct LiveConfig {
    /// Time an unauthenticated connection may stay open
    #[serde(default = "default_auth_timeout")]
    pub auth_timeout_secs: u64,

    /// Time between keepalive sweeps
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,

    /// What happens to a user's previous connection when they reconnect
    #[serde(default)]
    pub supersede_policy: SupersedePolicy,
}

impl LiveConfig {
    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.auth_timeout_secs == 0 {
            return Err(ValidationError::ZeroDuration("live.auth_timeout_secs"));
        }
        if self.heartbeat_interval_secs == 0 {
            return Err(ValidationError::ZeroDuration("live.heartbeat_interval_secs"));
        }
        Ok(())
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            auth_timeout_secs: default_auth_timeout(),
            heartbeat_interval_secs: default_heartbeat_interval(),
            supersede_policy: SupersedePolicy::default(),
        }
    }
}

fn default_auth_timeout() -> u64 {
    30
}

fn default_heartbeat_interval() -> u64 {
    50
}
