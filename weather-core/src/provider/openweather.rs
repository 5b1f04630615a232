use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::OpenWeatherConfig,
    error::FetchError,
    model::{CurrentWeather, Location, WeatherReading},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    units: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        let defaults = OpenWeatherConfig::default();
        Self {
            api_key,
            base_url: defaults.base_url,
            units: defaults.units,
            http: Client::new(),
        }
    }

    pub fn from_config(api_key: String, config: &OpenWeatherConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            units: config.units.clone(),
            http,
        })
    }

    /// Point the provider at another API root (a proxy, or a mock server in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_body(
        &self,
        endpoint: &'static str,
        path: &str,
        location: &Location,
    ) -> Result<String, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        let query = location.query();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            .map_err(|source| FetchError::Request { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| FetchError::Request { endpoint, source })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: i64,
    pressure: i64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

/// Shape an OpenWeather `/weather` body into a snapshot; any missing field is an error.
fn parse_current(body: &str) -> Result<CurrentWeather, FetchError> {
    const ENDPOINT: &str = "current weather";

    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed {
            endpoint: ENDPOINT,
            reason: e.to_string(),
        })?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Malformed {
            endpoint: ENDPOINT,
            reason: "`weather` contained no conditions".to_string(),
        })?;

    Ok(CurrentWeather {
        reading: WeatherReading {
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity: parsed.main.humidity,
            pressure: parsed.main.pressure,
            wind_speed: parsed.wind.speed,
            description: condition.description,
        },
        icon: condition.icon,
        city: parsed.name,
        country: parsed.sys.country,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, location: &Location) -> Result<CurrentWeather, FetchError> {
        let body = self.get_body("current weather", "weather", location).await?;
        parse_current(&body)
    }

    async fn forecast(&self, location: &Location) -> Result<serde_json::Value, FetchError> {
        let body = self.get_body("forecast", "forecast", location).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
            endpoint: "forecast",
            reason: e.to_string(),
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
