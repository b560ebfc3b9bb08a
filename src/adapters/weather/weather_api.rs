//! weatherapi.com provider.
//!
//! # Configuration
//!
//! ```ignore
//! let config = WeatherApiConfig::new(api_key)
//!     .with_base_url("https://api.weatherapi.com/v1")
//!     .with_timeout(Duration::from_secs(10));
//!
//! let provider = WeatherApiProvider::new(config)?;
//! ```
//!
//! Place names are folded to ASCII before they are sent. The continent is
//! taken from the location's time zone id (`Europe/Prague` -> `Europe`).

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::foundation::PlaceKey;
use crate::domain::place::CurrentConditions;
use crate::ports::{WeatherError, WeatherProvider};

use super::fold_accents;

/// Configuration for the weatherapi.com provider.
#[derive(Debug, Clone)]
pub struct WeatherApiConfig {
    api_key: Secret<String>,
    /// Base URL for the API (default: https://api.weatherapi.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl WeatherApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.weatherapi.com/v1".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

pub struct WeatherApiProvider {
    config: WeatherApiConfig,
    client: Client,
}

impl WeatherApiProvider {
    pub fn new(config: WeatherApiConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| WeatherError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, WeatherError> {
        let url = format!("{}/{}", self.config.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.config.api_key())])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| WeatherError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current(&self, place: &PlaceKey) -> Result<CurrentConditions, WeatherError> {
        let q = fold_accents(place.as_str());
        let response = self.get("current.json", &[("q", q.as_str())]).await?;
        let body: CurrentResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Malformed(e.to_string()))?;

        tracing::debug!(place = %place, temp_c = ?body.current.temp_c, "Fetched current weather");
        Ok(body.into_conditions())
    }

    async fn hourly_history(
        &self,
        place: &PlaceKey,
        day: NaiveDate,
    ) -> Result<Vec<Option<f64>>, WeatherError> {
        let q = fold_accents(place.as_str());
        let dt = day.format("%Y-%m-%d").to_string();
        let response = self
            .get("history.json", &[("q", q.as_str()), ("dt", dt.as_str())])
            .await?;
        let body: HistoryResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Malformed(e.to_string()))?;

        Ok(body.hourly_temperatures())
    }
}

// === Wire types ===

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    location: Option<Location>,
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Location {
    #[serde(default)]
    tz_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Current {
    #[serde(default)]
    temp_c: Option<f64>,
    #[serde(default)]
    condition: Option<Condition>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    #[serde(default)]
    text: Option<String>,
}

impl CurrentResponse {
    fn into_conditions(self) -> CurrentConditions {
        let continent = self
            .location
            .and_then(|l| l.tz_id)
            .and_then(|tz| continent_of(&tz));

        CurrentConditions {
            temperature: self.current.temp_c,
            condition: self.current.condition.and_then(|c| c.text),
            continent,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    forecast: Option<Forecast>,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    #[serde(default)]
    forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    #[serde(default)]
    hour: Vec<Hour>,
}

#[derive(Debug, Deserialize)]
struct Hour {
    #[serde(default)]
    temp_c: Option<f64>,
}

impl HistoryResponse {
    fn hourly_temperatures(self) -> Vec<Option<f64>> {
        self.forecast
            .and_then(|f| f.forecastday.into_iter().next())
            .map(|day| day.hour.into_iter().map(|h| h.temp_c).collect())
            .unwrap_or_default()
    }
}

/// Region prefix of an IANA time zone id.
fn continent_of(tz_id: &str) -> Option<String> {
    let prefix = tz_id.split('/').next()?.trim();
    if prefix.is_empty() {
        None
    } else {
        Some(prefix.to_string())
    }
}
