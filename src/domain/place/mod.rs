//! Place domain: weather state of named locations, its history, and the
//! rules for averaging and seeding it.

mod average;
mod events;
mod history;
#[allow(clippy::module_inception)]
mod place;
mod reading;

pub use average::{average_temperature, round_half_up};
pub use events::{
    HistorySeriesReady, PlaceHistoryRequested, PlaceWeatherRequested, PlacesEnriched,
    PlacesUpdated, RefreshAllPlacesRequested,
};
pub use history::{history_timestamp, seed_history};
pub use place::{CurrentConditions, EnrichedPlace, Place, PlaceHistory};
pub use reading::SensorReading;
