//! Weather provider adapters.
//!
//! - `WeatherApiProvider` - weatherapi.com over HTTPS
//! - `MockWeatherProvider` - Scripted responses for tests

mod accents;
mod mock;
mod weather_api;

pub use accents::fold_accents;
pub use mock::MockWeatherProvider;
pub use weather_api::{WeatherApiConfig, WeatherApiProvider};
