use crate::{
    error::StorageError,
    model::{Location, NewObservation, WeatherObservation, WeatherReading},
    store::ObservationStore,
};

/// Persists fetched readings as timestamped observations.
#[derive(Debug, Clone)]
pub struct ObservationRecorder {
    store: ObservationStore,
}

impl ObservationRecorder {
    pub fn new(store: ObservationStore) -> Self {
        Self { store }
    }

    /// Store `reading` for `location` stamped with the current time and hand the reading back.
    pub async fn record(
        &self,
        location: &Location,
        reading: WeatherReading,
    ) -> Result<WeatherReading, StorageError> {
        let new = NewObservation {
            location: location.clone(),
            reading,
            timestamp: None,
        };
        let stored = self.record_observation(new).await?;
        Ok(stored.reading())
    }

    /// Store a fully specified observation, returning it with its assigned id and timestamp.
    pub async fn record_observation(
        &self,
        new: NewObservation,
    ) -> Result<WeatherObservation, StorageError> {
        match self.store.insert(&new).await {
            Ok(stored) => Ok(stored),
            Err(e) => {
                tracing::error!(location = %new.location, error = %e, "failed to record observation");
                Err(e)
            }
        }
    }
}
