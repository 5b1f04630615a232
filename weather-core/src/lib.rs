//! Core library for the weather proxy.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider behind a `WeatherProvider` trait
//! - Observation history: a SQLite store with a recorder and a reader
//! - `WeatherService`, which ties fetching and recording together
//!
//! It is used by `weather-server`, but can also be reused by other binaries.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod reader;
pub mod recorder;
pub mod service;
pub mod store;

pub use config::{Config, DatabaseConfig, DefaultLocation, OpenWeatherConfig, ServerConfig};
pub use error::{FetchError, StorageError, WeatherError};
pub use model::{CurrentWeather, Location, NewObservation, WeatherObservation, WeatherReading};
pub use provider::{WeatherProvider, provider_from_config};
pub use reader::ObservationReader;
pub use recorder::ObservationRecorder;
pub use service::WeatherService;
pub use store::ObservationStore;
