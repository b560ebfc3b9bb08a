//! Weather handlers - provider lookups driven by request events.

mod weather_orchestrator;

pub use weather_orchestrator::{WeatherOrchestrator, DEFAULT_HISTORY_SAMPLES};
