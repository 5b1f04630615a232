//! HTTP surface of the weather proxy.
//!
//! Serves current conditions and forecasts from OpenWeather and the recorded
//! observation history as JSON.

use anyhow::Context;
use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use weather_core::{Config, Location, ObservationStore, WeatherService, provider_from_config};

pub mod api_error;
pub mod routes;
pub mod telemetry;

/// Application state shared across handlers.
#[derive(Debug)]
pub struct AppState {
    pub service: WeatherService,
    /// Used for requests that omit `city` or `country`.
    pub default_location: Location,
}

impl AppState {
    pub fn new(service: WeatherService, default_location: Location) -> Self {
        Self {
            service,
            default_location,
        }
    }
}

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/weather/current", get(routes::current))
        .route("/weather/forecast", get(routes::forecast))
        .route("/weather/historical", get(routes::historical))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `router` on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> anyhow::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

/// Build the provider and store from `config` and run the server.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let store = ObservationStore::connect(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database.url))?;

    let service = WeatherService::new(Arc::from(provider), store.clone());
    let state = Arc::new(AppState::new(service, config.default_location.location()));

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!("Starting weather server on {}", listener.local_addr()?);

    serve(listener, create_router(state)).await?;

    store.close().await;
    info!("Weather server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
