//! Request-level weather operations: fetch, shape, record, read.

use std::{num::NonZeroU32, sync::Arc};

use crate::{
    error::WeatherError,
    model::{CurrentWeather, Location, WeatherObservation},
    provider::WeatherProvider,
    reader::ObservationReader,
    recorder::ObservationRecorder,
    store::ObservationStore,
};

#[derive(Debug, Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    recorder: ObservationRecorder,
    reader: ObservationReader,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>, store: ObservationStore) -> Self {
        Self {
            provider,
            recorder: ObservationRecorder::new(store.clone()),
            reader: ObservationReader::new(store),
        }
    }

    /// Fetch current conditions and record them under the requested location.
    ///
    /// Nothing is written when the fetch fails. A failed write is returned as an
    /// error even though the fetch itself succeeded.
    pub async fn current(&self, location: &Location) -> Result<CurrentWeather, WeatherError> {
        let current = self.provider.current(location).await.inspect_err(|e| {
            tracing::warn!(location = %location, error = %e, "current weather fetch failed");
        })?;

        self.recorder
            .record(location, current.reading.clone())
            .await?;

        tracing::info!(location = %location, temperature = current.reading.temperature, "recorded current weather");
        Ok(current)
    }

    pub async fn forecast(&self, location: &Location) -> Result<serde_json::Value, WeatherError> {
        let forecast = self.provider.forecast(location).await.inspect_err(|e| {
            tracing::warn!(location = %location, error = %e, "forecast fetch failed");
        })?;
        Ok(forecast)
    }

    /// Most recent `days` observations for `location`; `days` is a row limit.
    pub async fn history(
        &self,
        location: &Location,
        days: NonZeroU32,
    ) -> Result<Vec<WeatherObservation>, WeatherError> {
        Ok(self.reader.recent(location, days).await?)
    }
}
