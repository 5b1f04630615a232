use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// City/country pair every weather operation is keyed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub city: String,
    pub country: String,
}

impl Location {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }

    /// Query form understood by OpenWeather, e.g. `London,UK`.
    pub fn query(&self) -> String {
        format!("{},{}", self.city, self.country)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.city, self.country)
    }
}

/// Structured result of a single current-weather fetch, before persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: i64,
    pub pressure: i64,
    pub wind_speed: f64,
    pub description: String,
}

/// Snapshot served by `/weather/current`.
///
/// `city` and `country` are the names reported by the upstream API, which may
/// differ from what the caller asked for (e.g. `GB` for `UK`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    #[serde(flatten)]
    pub reading: WeatherReading,
    pub icon: String,
    pub city: String,
    pub country: String,
}

/// Insert payload for the observation store.
#[derive(Debug, Clone)]
pub struct NewObservation {
    pub location: Location,
    pub reading: WeatherReading,
    /// Defaults to the moment of insertion.
    pub timestamp: Option<DateTime<Utc>>,
}

/// A stored weather reading for a location at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub id: i64,
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: i64,
    pub pressure: i64,
    pub wind_speed: f64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl WeatherObservation {
    pub fn location(&self) -> Location {
        Location::new(&self.city, &self.country)
    }

    pub fn reading(&self) -> WeatherReading {
        WeatherReading {
            temperature: self.temperature,
            feels_like: self.feels_like,
            humidity: self.humidity,
            pressure: self.pressure,
            wind_speed: self.wind_speed,
            description: self.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_query_joins_with_comma() {
        let loc = Location::new("London", "UK");
        assert_eq!(loc.query(), "London,UK");
        assert_eq!(loc.to_string(), "London, UK");
    }

    #[test]
    fn current_weather_serializes_flat() {
        let current = CurrentWeather {
            reading: WeatherReading {
                temperature: 12.5,
                feels_like: 11.0,
                humidity: 80,
                pressure: 1012,
                wind_speed: 4.1,
                description: "light rain".to_string(),
            },
            icon: "10d".to_string(),
            city: "London".to_string(),
            country: "GB".to_string(),
        };

        let json = serde_json::to_value(&current).unwrap();
        assert_eq!(json["temperature"], 12.5);
        assert_eq!(json["description"], "light rain");
        assert_eq!(json["icon"], "10d");
        assert_eq!(json["country"], "GB");
        assert!(json.get("reading").is_none());
    }
}
