//! Sensor Pilot server
//!
//! Loads configuration, wires the adapters into the event pipeline, starts
//! the background services and serves the HTTP and WebSocket routes until
//! Ctrl+C or SIGTERM.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::{net::TcpListener, signal, sync::watch, task::JoinHandle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sensor_pilot::adapters::auth::{InMemoryTokenBlacklist, JwtConfig, JwtSessionValidator};
use sensor_pilot::adapters::events::InMemoryEventBus;
use sensor_pilot::adapters::http::{app_router, CookieAuth, DiagramHandlers, HttpState, PlaceHandlers};
use sensor_pilot::adapters::memory::{
    InMemoryPlaceHistoryRepository, InMemoryPlaceRepository, InMemoryPlcRepository,
    InMemorySensorPlcRepository, InMemorySensorRepository, InMemoryUserPlcRepository,
    InMemoryUserSensorRepository,
};
use sensor_pilot::adapters::postgres::{
    self, PostgresPlaceHistoryRepository, PostgresPlaceRepository, PostgresPlcRepository,
    PostgresSensorPlcRepository, PostgresSensorRepository, PostgresTokenBlacklist,
    PostgresUserPlcRepository, PostgresUserSensorRepository,
};
use sensor_pilot::adapters::weather::{WeatherApiConfig, WeatherApiProvider};
use sensor_pilot::adapters::websocket::{LiveSocketState, LiveUpdateBridge};
use sensor_pilot::application::{
    BlacklistPurgeConfig, BlacklistPurgeService, DiagramStores, DiagramSubmittedHandler,
    DistributionStores, HeartbeatConfig, HeartbeatService, LiveSessionRegistry, PlaceAggregator,
    ReconcileDiagramHandler, SessionGate, UpdateDistributor, WeatherOrchestrator,
    WeatherRefreshService,
};
use sensor_pilot::config::{AppConfig, DatabaseConfig, ServerConfig};
use sensor_pilot::domain::foundation::DomainError;
use sensor_pilot::ports::{
    EventPublisher, PlaceHistoryRepository, PlaceRepository, PlcRepository, SensorPlcRepository,
    SensorRepository, TokenBlacklist, UserPlcRepository, UserSensorRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);

    let repos = Repositories::connect(&config.database).await?;
    let bus = Arc::new(InMemoryEventBus::new());
    let publisher: Arc<dyn EventPublisher> = bus.clone();

    // Pipeline handlers
    let reconciler = Arc::new(ReconcileDiagramHandler::new(
        repos.diagram_stores(),
        publisher.clone(),
    ));
    Arc::new(DiagramSubmittedHandler::new(reconciler.clone())).register(bus.as_ref());

    let weather = Arc::new(WeatherApiProvider::new(
        WeatherApiConfig::new(config.weather.api_key.expose_secret().clone())
            .with_base_url(config.weather.base_url.clone())
            .with_timeout(config.weather.timeout()),
    )?);
    Arc::new(
        WeatherOrchestrator::new(repos.places.clone(), weather, publisher.clone())
            .with_history_samples(config.weather.history_samples),
    )
    .register(bus.as_ref());

    Arc::new(PlaceAggregator::new(
        repos.places.clone(),
        repos.history.clone(),
        publisher.clone(),
    ))
    .register(bus.as_ref());

    Arc::new(UpdateDistributor::new(
        repos.distribution_stores(),
        publisher.clone(),
    ))
    .register(bus.as_ref());

    // Live sessions
    let registry = Arc::new(LiveSessionRegistry::new(config.live.supersede_policy));
    LiveUpdateBridge::new_shared(registry.clone()).register(bus.as_ref());

    let validator = Arc::new(JwtSessionValidator::new(
        JwtConfig::new(config.auth.jwt_secret.expose_secret().clone()),
        repos.blacklist.clone(),
    ));
    let gate = Arc::new(SessionGate::new(
        validator.clone(),
        registry.clone(),
        publisher.clone(),
        config.live.auth_timeout(),
    ));

    // Background services
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut tasks: Vec<JoinHandle<()>> = Vec::new();

    if config.scheduler.refresh_enabled {
        let refresh = WeatherRefreshService::new(publisher.clone());
        let rx = shutdown_rx.clone();
        tasks.push(tokio::spawn(async move { refresh.run(rx).await }));
    } else {
        info!("Scheduled weather refresh disabled");
    }

    let heartbeat = HeartbeatService::with_config(
        registry.clone(),
        HeartbeatConfig::default().with_interval(config.live.heartbeat_interval()),
    );
    let rx = shutdown_rx.clone();
    tasks.push(tokio::spawn(async move { heartbeat.run(rx).await }));

    let purge = BlacklistPurgeService::new(
        repos.blacklist.clone(),
        BlacklistPurgeConfig::default().with_interval(config.scheduler.blacklist_purge_interval()),
    );
    let rx = shutdown_rx.clone();
    tasks.push(tokio::spawn(async move { purge.run(rx).await }));

    // HTTP
    let app = app_router(HttpState {
        diagram: DiagramHandlers::new(reconciler),
        places: PlaceHandlers::new(repos.history.clone()),
        auth: CookieAuth::new(validator, config.auth.cookie_name.clone()),
        live: LiveSocketState::new(gate, config.auth.cookie_name.clone()),
    });

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "Sensor Pilot listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down background services");
    let _ = shutdown_tx.send(true);
    for result in futures::future::join_all(tasks).await {
        if let Err(err) = result {
            warn!(error = %err, "Background task ended abnormally");
        }
    }

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_new(&server.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if server.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).pretty().init();
    }
}

/// Storage behind every repository port.
struct Repositories {
    sensors: Arc<dyn SensorRepository>,
    plcs: Arc<dyn PlcRepository>,
    user_sensors: Arc<dyn UserSensorRepository>,
    user_plcs: Arc<dyn UserPlcRepository>,
    sensor_plcs: Arc<dyn SensorPlcRepository>,
    places: Arc<dyn PlaceRepository>,
    history: Arc<dyn PlaceHistoryRepository>,
    blacklist: Arc<dyn TokenBlacklist>,
}

impl Repositories {
    /// PostgreSQL when a database URL is configured, in-memory otherwise.
    async fn connect(config: &DatabaseConfig) -> Result<Self, DomainError> {
        let Some(url) = config.url() else {
            warn!("No database URL configured, state will not survive a restart");
            return Ok(Self::in_memory());
        };

        let pool = postgres::connect(url, config).await?;
        if config.run_migrations {
            postgres::run_migrations(&pool).await?;
            info!("Database migrations applied");
        }

        Ok(Self {
            sensors: Arc::new(PostgresSensorRepository::new(pool.clone())),
            plcs: Arc::new(PostgresPlcRepository::new(pool.clone())),
            user_sensors: Arc::new(PostgresUserSensorRepository::new(pool.clone())),
            user_plcs: Arc::new(PostgresUserPlcRepository::new(pool.clone())),
            sensor_plcs: Arc::new(PostgresSensorPlcRepository::new(pool.clone())),
            places: Arc::new(PostgresPlaceRepository::new(pool.clone())),
            history: Arc::new(PostgresPlaceHistoryRepository::new(pool.clone())),
            blacklist: Arc::new(PostgresTokenBlacklist::new(pool)),
        })
    }

    fn in_memory() -> Self {
        Self {
            sensors: Arc::new(InMemorySensorRepository::new()),
            plcs: Arc::new(InMemoryPlcRepository::new()),
            user_sensors: Arc::new(InMemoryUserSensorRepository::new()),
            user_plcs: Arc::new(InMemoryUserPlcRepository::new()),
            sensor_plcs: Arc::new(InMemorySensorPlcRepository::new()),
            places: Arc::new(InMemoryPlaceRepository::new()),
            history: Arc::new(InMemoryPlaceHistoryRepository::new()),
            blacklist: Arc::new(InMemoryTokenBlacklist::new()),
        }
    }

    fn diagram_stores(&self) -> DiagramStores {
        DiagramStores {
            sensors: self.sensors.clone(),
            plcs: self.plcs.clone(),
            user_sensors: self.user_sensors.clone(),
            user_plcs: self.user_plcs.clone(),
            sensor_plcs: self.sensor_plcs.clone(),
            places: self.places.clone(),
        }
    }

    fn distribution_stores(&self) -> DistributionStores {
        DistributionStores {
            sensors: self.sensors.clone(),
            user_sensors: self.user_sensors.clone(),
            user_plcs: self.user_plcs.clone(),
            sensor_plcs: self.sensor_plcs.clone(),
            places: self.places.clone(),
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        tokio::select! {
            _ = ctrl_c() => {},
            _ = terminate() => {},
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await;
    }
}

async fn ctrl_c() {
    if let Err(err) = signal::ctrl_c().await {
        warn!(?err, "Failed to install Ctrl+C handler");
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            term.recv().await;
        }
        Err(err) => warn!(?err, "Failed to install SIGTERM handler"),
    }
}
