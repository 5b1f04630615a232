use std::num::NonZeroU32;

use crate::{
    error::StorageError,
    model::{Location, WeatherObservation},
    store::ObservationStore,
};

/// Reads back recorded observations for a location.
#[derive(Debug, Clone)]
pub struct ObservationReader {
    store: ObservationStore,
}

impl ObservationReader {
    pub fn new(store: ObservationStore) -> Self {
        Self { store }
    }

    /// The `days` most recent observations for `location`, newest first.
    ///
    /// `days` counts rows, not calendar days: ten readings taken within an hour
    /// all count toward the limit.
    pub async fn recent(
        &self,
        location: &Location,
        days: NonZeroU32,
    ) -> Result<Vec<WeatherObservation>, StorageError> {
        self.store.recent(location, days.get()).await.inspect_err(|e| {
            tracing::error!(location = %location, error = %e, "failed to read observation history");
        })
    }
}
