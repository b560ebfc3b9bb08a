//! Service settings, read from `SENSOR_PILOT__*` environment variables.
//!
//! ```no_run
//! use sensor_pilot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("configuration loads");
//! config.validate().expect("configuration is valid");
//! println!("listening on {:?}", config.server.socket_addr());
//! ```

mod auth;
mod database;
mod error;
mod live;
mod scheduler;
mod server;
mod weather;

pub use auth::AuthConfig;
pub use database::{DatabaseConfig, PoolConfig};
pub use error::{ConfigError, ValidationError};
pub use live::LiveConfig;
pub use scheduler::SchedulerConfig;
pub use server::{Environment, ServerConfig};
pub use weather::WeatherConfig;

use serde::Deserialize;

/// Every section of the service's settings.
///
/// `auth` and `weather` carry secrets and have no defaults; the other
/// sections can be omitted entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub weather: WeatherConfig,
    #[serde(default)]
    pub live: LiveConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Reads `SENSOR_PILOT__<SECTION>__<KEY>` variables, after merging a
    /// `.env` file when one exists.
    ///
    /// `SENSOR_PILOT__LIVE__SUPERSEDE_POLICY=close_superseded` sets
    /// `live.supersede_policy`.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development
        let _ = dotenvy::dotenv();

        let source = config::Environment::default()
            .prefix("SENSOR_PILOT")
            .separator("__");
        let config = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Stops at the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.weather.validate()?;
        self.live.validate()?;
        self.scheduler.validate()
    }
}
