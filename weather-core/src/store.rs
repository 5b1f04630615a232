//! SQLite-backed observation store.
//!
//! A single `weather_data` table holds every recorded observation. Rows are
//! only ever inserted and read; there is no update or delete path.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::{str::FromStr, time::Duration};

use crate::error::StorageError;
use crate::model::{Location, NewObservation, WeatherObservation};

const ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Cloneable handle to the observation table.
#[derive(Debug, Clone)]
pub struct ObservationStore {
    pool: SqlitePool,
}

impl ObservationStore {
    /// Open (creating if needed) the database at `database_url` and run migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
            .connect_with(options)
            .await?;

        let store = Self::from_pool(pool).await?;
        tracing::info!(database_url, "observation store ready");
        Ok(store)
    }

    /// Private in-memory database, kept alive for the lifetime of the handle.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Append one observation. The row is committed whole or not at all.
    pub async fn insert(&self, new: &NewObservation) -> Result<WeatherObservation, StorageError> {
        let timestamp = new.timestamp.unwrap_or_else(Utc::now);
        let reading = &new.reading;

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "INSERT INTO weather_data
                (city, country, temperature, feels_like, humidity, pressure,
                 wind_speed, description, timestamp)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.location.city)
        .bind(&new.location.country)
        .bind(reading.temperature)
        .bind(reading.feels_like)
        .bind(reading.humidity)
        .bind(reading.pressure)
        .bind(reading.wind_speed)
        .bind(&reading.description)
        .bind(timestamp)
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();
        tx.commit().await?;

        tracing::debug!(id, location = %new.location, "inserted observation");

        Ok(WeatherObservation {
            id,
            city: new.location.city.clone(),
            country: new.location.country.clone(),
            temperature: reading.temperature,
            feels_like: reading.feels_like,
            humidity: reading.humidity,
            pressure: reading.pressure,
            wind_speed: reading.wind_speed,
            description: reading.description.clone(),
            timestamp,
        })
    }

    /// Up to `limit` observations for `location`, newest first.
    ///
    /// Equal timestamps fall back to insertion order, newest first.
    pub async fn recent(
        &self,
        location: &Location,
        limit: u32,
    ) -> Result<Vec<WeatherObservation>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, city, country, temperature, feels_like, humidity, pressure,
                    wind_speed, description, timestamp
             FROM weather_data
             WHERE city = ? AND country = ?
             ORDER BY timestamp DESC, id DESC
             LIMIT ?",
        )
        .bind(&location.city)
        .bind(&location.country)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_observation).collect()
    }

    /// Total number of stored observations.
    pub async fn count(&self) -> Result<i64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weather_data")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn row_to_observation(row: &SqliteRow) -> Result<WeatherObservation, StorageError> {
    let corrupt = |e: sqlx::Error| StorageError::DataCorruption(e.to_string());

    Ok(WeatherObservation {
        id: row.try_get("id").map_err(corrupt)?,
        city: row.try_get("city").map_err(corrupt)?,
        country: row.try_get("country").map_err(corrupt)?,
        temperature: row.try_get("temperature").map_err(corrupt)?,
        feels_like: row.try_get("feels_like").map_err(corrupt)?,
        humidity: row.try_get("humidity").map_err(corrupt)?,
        pressure: row.try_get("pressure").map_err(corrupt)?,
        wind_speed: row.try_get("wind_speed").map_err(corrupt)?,
        description: row.try_get("description").map_err(corrupt)?,
        timestamp: row
            .try_get::<DateTime<Utc>, _>("timestamp")
            .map_err(corrupt)?,
    })
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    let migration = |e: sqlx::Error| StorageError::Migration(e.to_string());

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS weather_data (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            city TEXT NOT NULL CHECK (city <> ''),
            country TEXT NOT NULL CHECK (country <> ''),
            temperature REAL NOT NULL,
            feels_like REAL NOT NULL,
            humidity INTEGER NOT NULL,
            pressure INTEGER NOT NULL,
            wind_speed REAL NOT NULL,
            description TEXT NOT NULL,
            timestamp TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(migration)?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_weather_location_time
         ON weather_data (city, country, timestamp DESC)",
    )
    .execute(pool)
    .await
    .map_err(migration)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeatherReading;
    use chrono::TimeZone;

    fn reading(temperature: f64) -> WeatherReading {
        WeatherReading {
            temperature,
            feels_like: temperature - 1.0,
            humidity: 70,
            pressure: 1015,
            wind_speed: 3.2,
            description: "clear sky".to_string(),
        }
    }

    fn new_obs(city: &str, country: &str, temperature: f64) -> NewObservation {
        NewObservation {
            location: Location::new(city, country),
            reading: reading(temperature),
            timestamp: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = ObservationStore::in_memory().await.unwrap();

        let first = store.insert(&new_obs("London", "UK", 10.0)).await.unwrap();
        let second = store.insert(&new_obs("London", "UK", 11.0)).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn insert_keeps_supplied_timestamp() {
        let store = ObservationStore::in_memory().await.unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let mut new = new_obs("Oslo", "NO", -3.5);
        new.timestamp = Some(at);
        store.insert(&new).await.unwrap();

        let rows = store.recent(&Location::new("Oslo", "NO"), 5).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].timestamp, at);
        assert_eq!(rows[0].reading(), reading(-3.5));
    }

    #[tokio::test]
    async fn recent_orders_by_timestamp_not_insertion() {
        let store = ObservationStore::in_memory().await.unwrap();
        let loc = Location::new("Rome", "IT");

        for (hour, temp) in [(9, 19.0), (15, 25.0), (12, 22.0)] {
            let mut new = new_obs("Rome", "IT", temp);
            new.timestamp = Some(Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap());
            store.insert(&new).await.unwrap();
        }

        let temps: Vec<f64> = store
            .recent(&loc, 10)
            .await
            .unwrap()
            .iter()
            .map(|o| o.temperature)
            .collect();
        assert_eq!(temps, vec![25.0, 22.0, 19.0]);
    }

    #[tokio::test]
    async fn equal_timestamps_fall_back_to_newest_id() {
        let store = ObservationStore::in_memory().await.unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        for temp in [1.0, 2.0, 3.0] {
            let mut new = new_obs("Bern", "CH", temp);
            new.timestamp = Some(at);
            store.insert(&new).await.unwrap();
        }

        let rows = store.recent(&Location::new("Bern", "CH"), 3).await.unwrap();
        let temps: Vec<f64> = rows.iter().map(|o| o.temperature).collect();
        assert_eq!(temps, vec![3.0, 2.0, 1.0]);
    }

    #[tokio::test]
    async fn empty_city_is_rejected_without_writing() {
        let store = ObservationStore::in_memory().await.unwrap();

        let err = store.insert(&new_obs("", "UK", 10.0)).await.unwrap_err();
        assert!(matches!(err, StorageError::Database(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn undecodable_row_is_data_corruption() {
        let store = ObservationStore::in_memory().await.unwrap();
        sqlx::query(
            "INSERT INTO weather_data
                (city, country, temperature, feels_like, humidity, pressure,
                 wind_speed, description, timestamp)
             VALUES ('Quito', 'EC', 14.0, 13.0, 77, 1020, 2.0, 'drizzle', 'not a time')",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let err = store
            .recent(&Location::new("Quito", "EC"), 5)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::DataCorruption(_)), "got {err:?}");
        assert!(err.to_string().contains("timestamp"));
    }

    #[tokio::test]
    async fn closed_store_reports_storage_error() {
        let store = ObservationStore::in_memory().await.unwrap();
        store.close().await;

        let err = store
            .recent(&Location::new("London", "UK"), 1)
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn file_database_survives_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("weather.db").display());

        let store = ObservationStore::connect(&url, 2).await.unwrap();
        store.insert(&new_obs("Lima", "PE", 18.0)).await.unwrap();
        store.close().await;

        let reopened = ObservationStore::connect(&url, 2).await.unwrap();
        let rows = reopened.recent(&Location::new("Lima", "PE"), 7).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].temperature, 18.0);
    }
}
