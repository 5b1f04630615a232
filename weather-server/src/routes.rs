//! Weather routes.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{num::NonZeroU32, sync::Arc};

use weather_core::{CurrentWeather, Location, WeatherObservation};

use crate::{AppState, api_error::ApiError};

const DEFAULT_DAYS: NonZeroU32 = NonZeroU32::new(7).unwrap();

/// `city`/`country` query, shared by every weather endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    pub city: Option<String>,
    pub country: Option<String>,
}

impl LocationQuery {
    /// Missing or blank values fall back to the configured default location.
    fn resolve(self, default: &Location) -> Location {
        let pick = |value: Option<String>, fallback: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };

        Location::new(
            pick(self.city, &default.city),
            pick(self.country, &default.country),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoricalQuery {
    #[serde(flatten)]
    pub location: LocationQuery,
    /// Number of most recent observations, not a calendar window.
    pub days: Option<String>,
}

/// One entry of `/weather/historical`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<WeatherObservation> for HistoryEntry {
    fn from(obs: WeatherObservation) -> Self {
        Self {
            city: obs.city,
            country: obs.country,
            temperature: obs.temperature,
            timestamp: obs.timestamp,
        }
    }
}

fn parse_days(raw: Option<&str>) -> Result<NonZeroU32, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_DAYS),
        Some(value) => value.parse::<NonZeroU32>().map_err(|_| {
            ApiError::BadRequest(format!("days must be a positive integer, got '{value}'"))
        }),
    }
}

pub async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to Weather App API",
        "endpoints": {
            "current_weather": "/weather/current?city=<city>&country=<country>",
            "forecast": "/weather/forecast?city=<city>&country=<country>",
            "historical": "/weather/historical?city=<city>&country=<country>&days=<days>"
        }
    }))
}

pub async fn current(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<CurrentWeather>, ApiError> {
    let Query(query) = query?;
    let location = query.resolve(&state.default_location);
    let current = state
        .service
        .current(&location)
        .await
        .map_err(ApiError::weather("Could not fetch weather data"))?;
    Ok(Json(current))
}

pub async fn forecast(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Query(query) = query?;
    let location = query.resolve(&state.default_location);
    let forecast = state
        .service
        .forecast(&location)
        .await
        .map_err(ApiError::weather("Could not fetch forecast data"))?;
    Ok(Json(forecast))
}

pub async fn historical(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HistoricalQuery>, QueryRejection>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let Query(query) = query?;
    let days = parse_days(query.days.as_deref())?;
    let location = query.location.resolve(&state.default_location);

    let history = state
        .service
        .history(&location, days)
        .await
        .map_err(ApiError::weather("Could not fetch historical data"))?;

    Ok(Json(history.into_iter().map(HistoryEntry::from).collect()))
}
