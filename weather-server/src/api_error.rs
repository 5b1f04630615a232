//! Typed API error for HTTP handlers.
//!
//! Every failure is rendered as `{"error": "message"}`. Upstream and storage
//! failures log the real cause and return the endpoint's fixed message.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use weather_core::WeatherError;

#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: a query parameter could not be interpreted.
    BadRequest(String),
    /// 500 Internal Server Error: fetch or storage failure behind `message`.
    Weather {
        message: &'static str,
        source: WeatherError,
    },
}

impl ApiError {
    pub fn weather(message: &'static str) -> impl FnOnce(WeatherError) -> Self {
        move |source| Self::Weather { message, source }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Weather { message, source } => {
                match &source {
                    WeatherError::Fetch(e) => tracing::warn!(error = %e, "{message}"),
                    WeatherError::Storage(e) if e.is_unavailable() => {
                        tracing::warn!(error = %e, "{message}: observation store unavailable")
                    }
                    WeatherError::Storage(e) => tracing::error!(error = %e, "{message}"),
                }
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_owned())
            }
        };
        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::{ObservationStore, StorageError};

    #[test]
    fn bad_request_maps_to_400() {
        let response = ApiError::BadRequest("days must be a positive integer".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn weather_failure_maps_to_500() {
        let err = ApiError::weather("Could not fetch historical data")(
            StorageError::Migration("boom".into()).into(),
        );
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unavailable_store_still_maps_to_500() {
        let store = ObservationStore::in_memory().await.unwrap();
        store.close().await;
        let source = store.count().await.unwrap_err();
        assert!(source.is_unavailable());

        let err = ApiError::weather("Could not fetch weather data")(source.into());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
