//! Background services.
//!
//! Each service runs a loop until its `watch` shutdown channel flips to
//! `true` or its sender is dropped, and exposes a single-cycle method for
//! tests.
//!
//! | Service | Default period | Work |
//! |---------|----------------|------|
//! | `WeatherRefreshService` | top of every hour | publishes `places.refresh_requested.v1` |
//! | `HeartbeatService` | 50s | `LiveSessionRegistry::sweep` |
//! | `BlacklistPurgeService` | 1h | drops expired revoked tokens |

mod blacklist_purge;
mod heartbeat;
mod weather_refresh;

pub use blacklist_purge::{BlacklistPurgeConfig, BlacklistPurgeService};
pub use heartbeat::{HeartbeatConfig, HeartbeatService};
pub use weather_refresh::{until_next_hour, WeatherRefreshService, SCHEDULER_TRIGGER};

use tokio::sync::watch;

/// True once shutdown was requested or can no longer be signalled.
pub(crate) fn shutdown_requested(
    changed: Result<(), watch::error::RecvError>,
    shutdown: &watch::Receiver<bool>,
) -> bool {
    changed.is_err() || *shutdown.borrow()
}
