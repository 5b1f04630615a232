use crate::{
    Config, CurrentWeather, FetchError, Location, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of live weather data.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `location`.
    async fn current(&self, location: &Location) -> Result<CurrentWeather, FetchError>;

    /// Multi-day forecast for `location`, as returned by the upstream API.
    async fn forecast(&self, location: &Location) -> Result<serde_json::Value, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    let provider = OpenWeatherProvider::from_config(api_key.to_owned(), &config.openweather)?;
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
