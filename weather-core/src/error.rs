//! Error types shared by the provider, the observation store and the service.

use thiserror::Error;

/// The upstream weather API could not be reached or returned unusable data.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure, timeout, or the body could not be read.
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status.
    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    /// Body was not valid JSON or lacked an expected field.
    #[error("malformed {endpoint} payload: {reason}")]
    Malformed {
        endpoint: &'static str,
        reason: String,
    },
}

/// Reading from or writing to the observation store failed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQL, connection or pool failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema setup failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// A stored row could not be turned back into an observation.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl StorageError {
    /// Whether the failure looks like the store being temporarily unreachable.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_))
        )
    }
}

/// Failure of a request-level weather operation.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
