//! HeartbeatService - periodic keepalive sweep over live sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant};

use crate::application::live::{LiveSessionRegistry, SweepReport};

use super::shutdown_requested;

#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Time between sweeps.
    pub interval: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(50),
        }
    }
}

impl HeartbeatConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Pings every registered session and reaps the closed ones.
///
/// This is the only path that removes sessions whose close was never
/// observed by the transport.
pub struct HeartbeatService {
    registry: Arc<LiveSessionRegistry>,
    config: HeartbeatConfig,
}

impl HeartbeatService {
    pub fn new(registry: Arc<LiveSessionRegistry>) -> Self {
        Self::with_config(registry, HeartbeatConfig::default())
    }

    pub fn with_config(registry: Arc<LiveSessionRegistry>, config: HeartbeatConfig) -> Self {
        Self { registry, config }
    }

    /// Run until shutdown. The first sweep happens one interval after start.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let period = self.config.interval;
        let mut interval = time::interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if shutdown_requested(changed, &shutdown) {
                        tracing::info!("Heartbeat service stopped");
                        return;
                    }
                }
                _ = interval.tick() => {
                    self.sweep_once().await;
                }
            }
        }
    }

    pub async fn sweep_once(&self) -> SweepReport {
        let report = self.registry.sweep().await;
        if report.reaped > 0 {
            tracing::info!(reaped = report.reaped, pinged = report.pinged, "Reaped closed live sessions");
        }
        report
    }
}
