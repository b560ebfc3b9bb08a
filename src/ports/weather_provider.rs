//! WeatherProvider port - external source of current and historical weather.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::foundation::PlaceKey;
use crate::domain::place::CurrentConditions;

/// Failures of a single provider call.
#[derive(Debug, Clone, Error)]
pub enum WeatherError {
    #[error("weather provider unreachable: {0}")]
    Transport(String),

    #[error("weather provider returned status {0}")]
    Status(u16),

    #[error("malformed weather response: {0}")]
    Malformed(String),
}

/// Remote weather lookups keyed by place name.
///
/// Every call is independent; callers decide how a failure degrades.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions at a place.
    async fn current(&self, place: &PlaceKey) -> Result<CurrentConditions, WeatherError>;

    /// Hourly temperatures for one day, oldest hour first. Hours the
    /// provider has no value for are `None`.
    async fn hourly_history(
        &self,
        place: &PlaceKey,
        day: NaiveDate,
    ) -> Result<Vec<Option<f64>>, WeatherError>;
}
