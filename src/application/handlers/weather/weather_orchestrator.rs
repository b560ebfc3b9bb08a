//! WeatherOrchestrator - Event handler that turns weather requests into
//! provider calls.
//!
//! Listens for:
//! - `places.refresh_requested.v1` - every known place
//! - `place.weather_requested.v1` - an explicit list of places
//! - `place.history_requested.v1` - yesterday's series for one place
//!
//! A failed lookup never aborts its batch. Current lookups fall back to
//! unknown conditions; history lookups fall back to an empty series.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use futures::future::join_all;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, EventEnvelope, PlaceKey, SerializableDomainEvent};
use crate::domain::place::{
    CurrentConditions, EnrichedPlace, HistorySeriesReady, PlaceHistoryRequested,
    PlaceWeatherRequested, PlacesEnriched, RefreshAllPlacesRequested,
};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber, PlaceRepository, WeatherProvider};

/// Number of hourly samples kept from a history lookup.
pub const DEFAULT_HISTORY_SAMPLES: usize = 10;

pub struct WeatherOrchestrator {
    place_repo: Arc<dyn PlaceRepository>,
    weather: Arc<dyn WeatherProvider>,
    event_publisher: Arc<dyn EventPublisher>,
    history_samples: usize,
}

impl WeatherOrchestrator {
    pub fn new(
        place_repo: Arc<dyn PlaceRepository>,
        weather: Arc<dyn WeatherProvider>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            place_repo,
            weather,
            event_publisher,
            history_samples: DEFAULT_HISTORY_SAMPLES,
        }
    }

    pub fn with_history_samples(mut self, samples: usize) -> Self {
        self.history_samples = samples;
        self
    }

    pub fn register(self: &Arc<Self>, subscriber: &impl EventSubscriber) {
        subscriber.subscribe_all(
            &[
                RefreshAllPlacesRequested::EVENT_TYPE,
                PlaceWeatherRequested::EVENT_TYPE,
                PlaceHistoryRequested::EVENT_TYPE,
            ],
            self.clone(),
        );
    }

    /// Enriches every stored place as one batch.
    pub async fn refresh_all(&self) -> Result<(), DomainError> {
        let places: Vec<PlaceKey> = self
            .place_repo
            .find_all()
            .await?
            .into_iter()
            .map(|p| p.key)
            .collect();

        tracing::info!(places = places.len(), "Refreshing weather for all places");
        self.refresh_places(Uuid::new_v4(), places).await
    }

    /// Looks up current weather for `places` concurrently, then publishes
    /// the whole batch at once.
    pub async fn refresh_places(&self, batch_id: Uuid, places: Vec<PlaceKey>) -> Result<(), DomainError> {
        if places.is_empty() {
            return Ok(());
        }

        let enriched = join_all(places.into_iter().map(|place| self.lookup_current(place))).await;

        let event = PlacesEnriched::new(batch_id, enriched);
        self.event_publisher.publish(event.to_envelope()?).await
    }

    async fn lookup_current(&self, place: PlaceKey) -> EnrichedPlace {
        let conditions = match self.weather.current(&place).await {
            Ok(conditions) => {
                tracing::info!(place = %place, temperature = ?conditions.temperature, "Received weather");
                conditions
            }
            Err(e) => {
                tracing::warn!(place = %place, error = %e, "Weather lookup failed");
                CurrentConditions::unknown()
            }
        };
        EnrichedPlace::new(place, conditions)
    }

    /// Fetches the hourly series of the day before `today` for `place`.
    pub async fn fetch_history(&self, place: PlaceKey, today: NaiveDate) -> Result<(), DomainError> {
        let day = today.checked_sub_days(Days::new(1)).unwrap_or(today);

        let temperatures: Vec<f64> = match self.weather.hourly_history(&place, day).await {
            Ok(series) => series
                .into_iter()
                .flatten()
                .take(self.history_samples)
                .collect(),
            Err(e) => {
                tracing::warn!(place = %place, error = %e, "Weather history lookup failed");
                Vec::new()
            }
        };

        tracing::info!(place = %place, samples = temperatures.len(), "Received weather history");

        let event = HistorySeriesReady::new(place, temperatures);
        self.event_publisher.publish(event.to_envelope()?).await
    }
}

#[async_trait]
impl EventHandler for WeatherOrchestrator {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        match event.event_type.as_str() {
            RefreshAllPlacesRequested::EVENT_TYPE => self.refresh_all().await,
            PlaceWeatherRequested::EVENT_TYPE => {
                let request: PlaceWeatherRequested = event.payload_as()?;
                self.refresh_places(request.batch_id, request.places).await
            }
            PlaceHistoryRequested::EVENT_TYPE => {
                let request: PlaceHistoryRequested = event.payload_as()?;
                self.fetch_history(request.place, Utc::now().date_naive()).await
            }
            other => {
                tracing::debug!(event_type = other, "Ignoring event");
                Ok(())
            }
        }
    }

    fn name(&self) -> &'static str {
        "WeatherOrchestrator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemoryPlaceRepository;
    use crate::adapters::weather::MockWeatherProvider;
    use crate::domain::place::Place;
    use crate::ports::WeatherError;

    fn orchestrator(
        weather: MockWeatherProvider,
        places: Arc<InMemoryPlaceRepository>,
    ) -> (Arc<WeatherOrchestrator>, Arc<InMemoryEventBus>) {
        let bus = Arc::new(InMemoryEventBus::recording());
        let orchestrator = Arc::new(WeatherOrchestrator::new(places, Arc::new(weather), bus.clone()));
        (orchestrator, bus)
    }

    fn enriched_batches(bus: &InMemoryEventBus) -> Vec<PlacesEnriched> {
        bus.events_of_type(PlacesEnriched::EVENT_TYPE)
            .iter()
            .map(|e| e.payload_as().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn failed_place_stays_in_batch_with_unknown_conditions() {
        let weather = MockWeatherProvider::new()
            .with_current("Yerevan", 18.0, "Clear", "Asia")
            .with_current_error("Xanthi", WeatherError::Transport("timeout".to_string()));
        let (orchestrator, bus) = orchestrator(weather, Arc::new(InMemoryPlaceRepository::new()));

        orchestrator
            .refresh_places(Uuid::new_v4(), vec![PlaceKey::new("Xanthi"), PlaceKey::new("Yerevan")])
            .await
            .unwrap();

        let batches = enriched_batches(&bus);
        assert_eq!(batches.len(), 1);
        let places = &batches[0].places;
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].place, PlaceKey::new("Xanthi"));
        assert!(places[0].conditions.is_unknown());
        assert_eq!(places[1].conditions.temperature, Some(18.0));
        assert_eq!(places[1].conditions.continent.as_deref(), Some("Asia"));
    }

    #[tokio::test]
    async fn refresh_all_covers_every_stored_place() {
        let places = Arc::new(InMemoryPlaceRepository::new());
        places
            .upsert_all(&[
                Place::unobserved(PlaceKey::new("Accra")),
                Place::unobserved(PlaceKey::new("Baku")),
            ])
            .await
            .unwrap();
        let weather = MockWeatherProvider::new().with_current("Accra", 30.0, "Humid", "Africa");
        let (orchestrator, bus) = orchestrator(weather, places);

        orchestrator.register(bus.as_ref());
        bus.publish(RefreshAllPlacesRequested::new("test").to_envelope().unwrap())
            .await
            .unwrap();

        let batches = enriched_batches(&bus);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].places.len(), 2);
    }

    #[tokio::test]
    async fn empty_place_list_publishes_nothing() {
        let (orchestrator, bus) = orchestrator(
            MockWeatherProvider::new(),
            Arc::new(InMemoryPlaceRepository::new()),
        );
        orchestrator.refresh_places(Uuid::new_v4(), vec![]).await.unwrap();
        assert!(!bus.has_event(PlacesEnriched::EVENT_TYPE));
    }

    #[tokio::test]
    async fn weather_request_keeps_its_batch_id() {
        let weather = MockWeatherProvider::new().with_current("Cusco", 12.0, "Cloudy", "America");
        let (orchestrator, bus) = orchestrator(weather, Arc::new(InMemoryPlaceRepository::new()));
        orchestrator.register(bus.as_ref());

        let request = PlaceWeatherRequested::new(vec![PlaceKey::new("Cusco")]);
        bus.publish(request.to_envelope().unwrap()).await.unwrap();

        assert_eq!(enriched_batches(&bus)[0].batch_id, request.batch_id);
    }

    #[tokio::test]
    async fn history_asks_for_yesterday_and_keeps_first_samples() {
        let series: Vec<f64> = (0..24).map(|h| h as f64).collect();
        let weather = MockWeatherProvider::new().with_history("Doha", series);
        let bus = Arc::new(InMemoryEventBus::recording());
        let weather = Arc::new(weather);
        let orchestrator = WeatherOrchestrator::new(
            Arc::new(InMemoryPlaceRepository::new()),
            weather.clone(),
            bus.clone(),
        );

        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        orchestrator.fetch_history(PlaceKey::new("Doha"), today).await.unwrap();

        assert_eq!(weather.calls(), vec!["history:Doha:2024-02-29".to_string()]);
        let ready: HistorySeriesReady = bus.events_of_type(HistorySeriesReady::EVENT_TYPE)[0]
            .payload_as()
            .unwrap();
        assert_eq!(ready.temperatures, (0..10).map(|h| h as f64).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn failed_history_yields_empty_series() {
        let weather = MockWeatherProvider::new().with_history_error("Eilat", WeatherError::Status(500));
        let (orchestrator, bus) = orchestrator(weather, Arc::new(InMemoryPlaceRepository::new()));

        orchestrator
            .fetch_history(PlaceKey::new("Eilat"), Utc::now().date_naive())
            .await
            .unwrap();

        let ready: HistorySeriesReady = bus.events_of_type(HistorySeriesReady::EVENT_TYPE)[0]
            .payload_as()
            .unwrap();
        assert!(ready.temperatures.is_empty());
    }

    #[tokio::test]
    async fn sample_count_is_configurable() {
        let weather = MockWeatherProvider::new().with_history("Fes", vec![1.0, 2.0, 3.0, 4.0]);
        let bus = Arc::new(InMemoryEventBus::recording());
        let orchestrator = WeatherOrchestrator::new(
            Arc::new(InMemoryPlaceRepository::new()),
            Arc::new(weather),
            bus.clone(),
        )
        .with_history_samples(2);

        orchestrator
            .fetch_history(PlaceKey::new("Fes"), Utc::now().date_naive())
            .await
            .unwrap();

        let ready: HistorySeriesReady = bus.events_of_type(HistorySeriesReady::EVENT_TYPE)[0]
            .payload_as()
            .unwrap();
        assert_eq!(ready.temperatures, vec![1.0, 2.0]);
    }
}
