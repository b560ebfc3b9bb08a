//! BlacklistPurgeService - drops revoked tokens that have expired anyway.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant};

use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::TokenBlacklist;

use super::shutdown_requested;

#[derive(Debug, Clone)]
pub struct BlacklistPurgeConfig {
    pub interval: Duration,
}

impl Default for BlacklistPurgeConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
        }
    }
}

impl BlacklistPurgeConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

pub struct BlacklistPurgeService {
    blacklist: Arc<dyn TokenBlacklist>,
    config: BlacklistPurgeConfig,
}

impl BlacklistPurgeService {
    pub fn new(blacklist: Arc<dyn TokenBlacklist>, config: BlacklistPurgeConfig) -> Self {
        Self { blacklist, config }
    }

    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let period = self.config.interval;
        let mut interval = time::interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if shutdown_requested(changed, &shutdown) {
                        tracing::info!("Blacklist purge service stopped");
                        return;
                    }
                }
                _ = interval.tick() => {
                    if let Err(e) = self.purge_once(Timestamp::now()).await {
                        tracing::warn!(error = %e, "Blacklist purge failed");
                    }
                }
            }
        }
    }

    /// Removes entries whose token expired before `now`.
    pub async fn purge_once(&self, now: Timestamp) -> Result<usize, DomainError> {
        let purged = self.blacklist.purge_expired(now).await?;
        if purged > 0 {
            tracing::info!(purged, "Purged expired blacklist entries");
        }
        Ok(purged)
    }
}
