//! PlaceAggregator - Event handler folding weather results into place state.
//!
//! Listens for:
//! - `places.enriched.v1` - recompute averages, upsert places, append history
//! - `place.history_ready.v1` - seed backdated history for a new place
//!
//! Publishes `places.updated.v1` once a batch is persisted.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, EventEnvelope, PlaceKey, SerializableDomainEvent, Timestamp};
use crate::domain::place::{
    average_temperature, seed_history, HistorySeriesReady, Place, PlaceHistory, PlacesEnriched,
    PlacesUpdated,
};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber, PlaceHistoryRepository, PlaceRepository};

pub struct PlaceAggregator {
    place_repo: Arc<dyn PlaceRepository>,
    history_repo: Arc<dyn PlaceHistoryRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl PlaceAggregator {
    pub fn new(
        place_repo: Arc<dyn PlaceRepository>,
        history_repo: Arc<dyn PlaceHistoryRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            place_repo,
            history_repo,
            event_publisher,
        }
    }

    pub fn register(self: &Arc<Self>, subscriber: &impl EventSubscriber) {
        subscriber.subscribe_all(
            &[PlacesEnriched::EVENT_TYPE, HistorySeriesReady::EVENT_TYPE],
            self.clone(),
        );
    }

    /// Persists a batch of lookups and hands it on for distribution.
    pub async fn on_enriched(&self, batch: PlacesEnriched, now: Timestamp) -> Result<(), DomainError> {
        let mut places = Vec::with_capacity(batch.places.len());
        let mut samples = Vec::with_capacity(batch.places.len());

        for enriched in &batch.places {
            let history = self.history_repo.temperatures(&enriched.place).await?;
            let average = average_temperature(history, enriched.conditions.temperature);

            places.push(Place::observed(enriched, average, now));
            samples.push(PlaceHistory::from_lookup(enriched, now));
        }

        self.place_repo.upsert_all(&places).await?;
        self.history_repo.append_all(&samples).await?;

        tracing::info!(batch_id = %batch.batch_id, places = places.len(), "Place state updated");

        let event = PlacesUpdated::new(batch.batch_id, places);
        self.event_publisher.publish(event.to_envelope()?).await
    }

    /// Stores a history series as hourly samples reaching back from `now`.
    ///
    /// A stored place gets its average recomputed. It is only republished
    /// when it already has a current temperature to show.
    pub async fn on_history(
        &self,
        place: PlaceKey,
        temperatures: &[f64],
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let rows = seed_history(&place, temperatures, now);
        if rows.is_empty() {
            tracing::debug!(place = %place, "No history to seed");
            return Ok(());
        }
        self.history_repo.append_all(&rows).await?;
        tracing::info!(place = %place, samples = rows.len(), "Seeded place history");

        let Some(mut stored) = self.place_repo.find(&place).await? else {
            return Ok(());
        };

        let history = self.history_repo.temperatures(&place).await?;
        stored.average_temperature = average_temperature(history, stored.temperature);
        self.place_repo.upsert_all(std::slice::from_ref(&stored)).await?;

        if stored.temperature.is_some() {
            let event = PlacesUpdated::new(Uuid::new_v4(), vec![stored]);
            self.event_publisher.publish(event.to_envelope()?).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl EventHandler for PlaceAggregator {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        match event.event_type.as_str() {
            PlacesEnriched::EVENT_TYPE => {
                let batch: PlacesEnriched = event.payload_as()?;
                self.on_enriched(batch, Timestamp::now()).await
            }
            HistorySeriesReady::EVENT_TYPE => {
                let series: HistorySeriesReady = event.payload_as()?;
                self.on_history(series.place, &series.temperatures, Timestamp::now())
                    .await
            }
            other => {
                tracing::debug!(event_type = other, "Ignoring event");
                Ok(())
            }
        }
    }

    fn name(&self) -> &'static str {
        "PlaceAggregator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::{InMemoryPlaceHistoryRepository, InMemoryPlaceRepository};
    use crate::domain::place::{CurrentConditions, EnrichedPlace};

    struct Fixture {
        places: Arc<InMemoryPlaceRepository>,
        history: Arc<InMemoryPlaceHistoryRepository>,
        bus: Arc<InMemoryEventBus>,
        aggregator: PlaceAggregator,
    }

    fn fixture() -> Fixture {
        let places = Arc::new(InMemoryPlaceRepository::new());
        let history = Arc::new(InMemoryPlaceHistoryRepository::new());
        let bus = Arc::new(InMemoryEventBus::recording());
        Fixture {
            aggregator: PlaceAggregator::new(places.clone(), history.clone(), bus.clone()),
            places,
            history,
            bus,
        }
    }

    fn sunny(place: &str, temperature: f64) -> EnrichedPlace {
        EnrichedPlace::new(
            PlaceKey::new(place),
            CurrentConditions {
                temperature: Some(temperature),
                condition: Some("Sunny".to_string()),
                continent: Some("Europe".to_string()),
            },
        )
    }

    fn updates(bus: &InMemoryEventBus) -> Vec<PlacesUpdated> {
        bus.events_of_type(PlacesUpdated::EVENT_TYPE)
            .iter()
            .map(|e| e.payload_as().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn average_collapses_duplicate_temperatures() {
        let f = fixture();
        let now = Timestamp::now();
        f.history
            .append_all(&seed_history(&PlaceKey::new("Nice"), &[10.0, 12.0, 14.0], now.minus_hours(24)))
            .await
            .unwrap();

        f.aggregator
            .on_enriched(PlacesEnriched::new(Uuid::new_v4(), vec![sunny("Nice", 10.0)]), now)
            .await
            .unwrap();

        let place = f.places.find(&PlaceKey::new("Nice")).await.unwrap().unwrap();
        assert_eq!(place.temperature, Some(10.0));
        assert_eq!(place.average_temperature, Some(12.0));
        assert_eq!(place.continent.as_deref(), Some("Europe"));
    }

    #[tokio::test]
    async fn every_enriched_place_gets_a_history_row() {
        let f = fixture();
        let failed = EnrichedPlace::new(PlaceKey::new("Gone"), CurrentConditions::unknown());

        f.aggregator
            .on_enriched(
                PlacesEnriched::new(Uuid::new_v4(), vec![sunny("Oran", 21.0), failed]),
                Timestamp::now(),
            )
            .await
            .unwrap();

        assert_eq!(f.history.count(&PlaceKey::new("Oran")).await, 1);
        assert_eq!(f.history.count(&PlaceKey::new("Gone")).await, 1);
        let gone = f.places.find(&PlaceKey::new("Gone")).await.unwrap().unwrap();
        assert_eq!(gone.average_temperature, None);
    }

    #[tokio::test]
    async fn enriched_batch_is_republished_with_its_id() {
        let f = fixture();
        let batch = PlacesEnriched::new(Uuid::new_v4(), vec![sunny("Pula", 19.0), sunny("Rab", 20.0)]);
        let batch_id = batch.batch_id;

        f.aggregator.on_enriched(batch, Timestamp::now()).await.unwrap();

        let published = updates(&f.bus);
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].batch_id, batch_id);
        assert_eq!(published[0].places.len(), 2);
    }

    #[tokio::test]
    async fn history_series_seeds_ten_backdated_rows() {
        let f = fixture();
        let key = PlaceKey::new("Tromso");
        f.places.insert_if_absent(Place::unobserved(key.clone())).await.unwrap();
        let series: Vec<f64> = (0..10).map(|i| -5.0 + i as f64).collect();
        let now = Timestamp::now();

        f.aggregator.on_history(key.clone(), &series, now).await.unwrap();

        let latest = f.history.find_latest(&key, 10).await.unwrap();
        assert_eq!(latest.len(), 10);
        assert_eq!(latest[0].updated_at, now);
        for pair in latest.windows(2) {
            assert!(pair[0].updated_at.is_after(&pair[1].updated_at));
        }

        let place = f.places.find(&key).await.unwrap().unwrap();
        assert_eq!(place.average_temperature, Some(-0.5));
        // No current temperature yet, nothing to show
        assert!(updates(&f.bus).is_empty());
    }

    #[tokio::test]
    async fn history_for_observed_place_is_republished() {
        let f = fixture();
        f.aggregator
            .on_enriched(PlacesEnriched::new(Uuid::new_v4(), vec![sunny("Umea", 4.0)]), Timestamp::now())
            .await
            .unwrap();
        f.bus.clear();

        f.aggregator
            .on_history(PlaceKey::new("Umea"), &[2.0], Timestamp::now())
            .await
            .unwrap();

        let published = updates(&f.bus);
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].places[0].average_temperature, Some(3.0));
    }

    #[tokio::test]
    async fn empty_series_writes_nothing() {
        let f = fixture();
        f.aggregator
            .on_history(PlaceKey::new("Void"), &[], Timestamp::now())
            .await
            .unwrap();
        assert_eq!(f.history.count(&PlaceKey::new("Void")).await, 0);
    }
}
