//! WeatherRefreshService - hourly trigger for the weather pipeline.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use tokio::sync::watch;
use tokio::time;

use crate::domain::foundation::{DomainError, SerializableDomainEvent};
use crate::domain::place::RefreshAllPlacesRequested;
use crate::ports::EventPublisher;

use super::shutdown_requested;

/// Trigger name carried by scheduled refresh requests.
pub const SCHEDULER_TRIGGER: &str = "scheduler";

/// Time left until the next full hour. Exactly on the hour gives a full hour.
pub fn until_next_hour(now: DateTime<Utc>) -> Duration {
    let into_hour = u64::from(now.minute()) * 60 + u64::from(now.second());
    let nanos = u64::from(now.nanosecond().min(999_999_999));
    Duration::from_secs(3600 - into_hour).saturating_sub(Duration::from_nanos(nanos))
}

/// Publishes a refresh-all request at the top of every hour.
pub struct WeatherRefreshService {
    event_publisher: Arc<dyn EventPublisher>,
}

impl WeatherRefreshService {
    pub fn new(event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self { event_publisher }
    }

    /// Run until shutdown. A failed refresh is logged and the next hour
    /// is still scheduled.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            let wait = until_next_hour(Utc::now());
            tracing::debug!(wait_secs = wait.as_secs(), "Next weather refresh scheduled");

            tokio::select! {
                changed = shutdown.changed() => {
                    if shutdown_requested(changed, &shutdown) {
                        tracing::info!("Weather refresh service stopped");
                        return;
                    }
                }
                _ = time::sleep(wait) => {
                    if let Err(e) = self.trigger().await {
                        tracing::error!(error = %e, "Scheduled weather refresh failed");
                    }
                }
            }
        }
    }

    /// Publishes one refresh request.
    pub async fn trigger(&self) -> Result<(), DomainError> {
        tracing::info!("Triggering weather refresh for all places");
        let event = RefreshAllPlacesRequested::new(SCHEDULER_TRIGGER);
        self.event_publisher.publish(event.to_envelope()?).await
    }
}
