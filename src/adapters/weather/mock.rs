//! Scripted weather provider for tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::PlaceKey;
use crate::domain::place::CurrentConditions;
use crate::ports::{WeatherError, WeatherProvider};

/// Weather provider answering from preset tables.
///
/// Places without a preset answer fail with `WeatherError::Status(400)`,
/// which is what the real API returns for unknown locations.
#[derive(Debug, Default)]
pub struct MockWeatherProvider {
    current: Mutex<HashMap<PlaceKey, Result<CurrentConditions, WeatherError>>>,
    history: Mutex<HashMap<PlaceKey, Result<Vec<Option<f64>>, WeatherError>>>,
    calls: Mutex<Vec<String>>,
}

impl MockWeatherProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current(self, place: &str, temperature: f64, condition: &str, continent: &str) -> Self {
        self.lock_current().insert(
            PlaceKey::new(place),
            Ok(CurrentConditions {
                temperature: Some(temperature),
                condition: Some(condition.to_string()),
                continent: Some(continent.to_string()),
            }),
        );
        self
    }

    pub fn with_current_error(self, place: &str, error: WeatherError) -> Self {
        self.lock_current().insert(PlaceKey::new(place), Err(error));
        self
    }

    pub fn with_history(self, place: &str, temperatures: Vec<f64>) -> Self {
        self.lock_history().insert(
            PlaceKey::new(place),
            Ok(temperatures.into_iter().map(Some).collect()),
        );
        self
    }

    pub fn with_history_error(self, place: &str, error: WeatherError) -> Self {
        self.lock_history().insert(PlaceKey::new(place), Err(error));
        self
    }

    /// Calls received so far, as `current:<place>` or `history:<place>:<date>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(call);
    }

    fn lock_current(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<PlaceKey, Result<CurrentConditions, WeatherError>>> {
        self.current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_history(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<PlaceKey, Result<Vec<Option<f64>>, WeatherError>>> {
        self.history
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl WeatherProvider for MockWeatherProvider {
    async fn current(&self, place: &PlaceKey) -> Result<CurrentConditions, WeatherError> {
        self.record(format!("current:{}", place));
        self.lock_current()
            .get(place)
            .cloned()
            .unwrap_or(Err(WeatherError::Status(400)))
    }

    async fn hourly_history(
        &self,
        place: &PlaceKey,
        day: NaiveDate,
    ) -> Result<Vec<Option<f64>>, WeatherError> {
        self.record(format!("history:{}:{}", place, day));
        self.lock_history()
            .get(place)
            .cloned()
            .unwrap_or(Err(WeatherError::Status(400)))
    }
}
