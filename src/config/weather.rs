//! Weather provider configuration (weatherapi.com)

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    /// API key sent as the `key` query parameter
    pub api_key: Secret<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Hourly samples kept when seeding a new place
    #[serde(default = "default_history_samples")]
    pub history_samples: usize,
}

impl WeatherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            history_samples: default_history_samples(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("WEATHER__API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidWeatherUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::ZeroDuration("weather.timeout_secs"));
        }
        if !(1..=24).contains(&self.history_samples) {
            return Err(ValidationError::InvalidHistorySamples);
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://api.weatherapi.com/v1".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_history_samples() -> usize {
    10
}
