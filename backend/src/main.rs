//! Prayer Times Platform - Backend Server
//!
//! Computes the seven daily Islamic prayer times for a date and coordinate,
//! keeps a current date/coordinate that place lookups and explicit updates
//! feed, and serves both over a JSON API.

use axum::{routing::get, Router};
use chrono_tz::Tz;
use shared::{CivilDate, SunCalculator};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::GeocodingClient;
use services::{ConfiguredLocation, Orchestrator, PrayerTimesService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub service: PrayerTimesService,
    pub orchestrator: Arc<RwLock<Orchestrator>>,
    /// `None` when no API key is configured
    pub geocoder: Option<GeocodingClient>,
    /// Stand-in for the device location sensor
    pub location: ConfiguredLocation,
    /// Display zone for rendered times
    pub zone: Tz,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let zone = config.display.zone()?;
        let calculator = SunCalculator::with_observer_height(config.ephemeris.observer_height_m);
        let service = PrayerTimesService::new(Arc::new(calculator));

        let geocoder = if config.geocoding.is_enabled() {
            Some(GeocodingClient::new(&config.geocoding)?)
        } else {
            tracing::warn!("No geocoding API key configured; place lookups are disabled");
            None
        };

        let location = ConfiguredLocation::from_config(&config.location);
        let orchestrator = Orchestrator::new(service.clone(), zone, CivilDate::today(&zone));

        Ok(Self {
            config: Arc::new(config),
            service,
            orchestrator: Arc::new(RwLock::new(orchestrator)),
            geocoder,
            location,
            zone,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing, as JSON lines in production
    let json_logs = std::env::var("PRAYER_ENVIRONMENT").is_ok_and(|env| env == "production");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prayer_server=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    // Load configuration
    let config = config::Config::load()?;

    tracing::info!("Starting Prayer Times Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Display time zone: {}", config.display.timezone);

    let addr = config.server.bind_address();

    // Create application state
    let state = AppState::new(config)?;

    // One-shot device location, applied unless a newer coordinate beats it
    spawn_startup_location(state.clone());

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn spawn_startup_location(state: AppState) {
    tokio::spawn(async move {
        let ticket = state.orchestrator.write().await.issue_ticket();
        match state.location.locate().await {
            Ok(coordinate) => {
                let applied = state
                    .orchestrator
                    .write()
                    .await
                    .apply_location(ticket, Some(coordinate));
                if applied {
                    tracing::info!("Using configured location {}", coordinate);
                }
            }
            Err(e) => tracing::warn!("{}; waiting for a coordinate or place lookup", e),
        }
    });
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Prayer Times Platform API v1.0"
}
