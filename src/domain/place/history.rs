//! Seeding history for places seen for the first time.

use crate::domain::foundation::{PlaceKey, Timestamp};

use super::PlaceHistory;

/// Synthetic timestamp of the `i`-th seeded sample: `now - i hours`.
pub fn history_timestamp(now: Timestamp, i: usize) -> Timestamp {
    now.minus_hours(i as i64)
}

/// One history row per temperature, the first sample stamped `now` and each
/// following one an hour further back.
pub fn seed_history(place: &PlaceKey, temperatures: &[f64], now: Timestamp) -> Vec<PlaceHistory> {
    temperatures
        .iter()
        .enumerate()
        .map(|(i, temperature)| {
            let at = history_timestamp(now, i);
            PlaceHistory {
                place: place.clone(),
                temperature: Some(*temperature),
                condition: None,
                created_at: at,
                updated_at: at,
            }
        })
        .collect()
}
