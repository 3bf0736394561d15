use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{condition::WeatherCondition, error::WeatherError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// `lat,lng` form used in provider queries.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// How the caller wants the location acquired.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationRequest {
    /// Free-text place name, resolved through the geocoder.
    Name(String),
    /// Ask the device location sensor.
    Device,
    /// A point picked directly, e.g. on a map.
    Point { latitude: f64, longitude: f64 },
}

impl LocationRequest {
    /// Label used for the report when no better name is known.
    pub fn describe(&self) -> String {
        match self {
            LocationRequest::Name(name) => name.trim().to_string(),
            LocationRequest::Device => "Current location".to_string(),
            LocationRequest::Point { latitude, longitude } => {
                Coordinates::new(*latitude, *longitude).to_string()
            }
        }
    }
}

/// Granularity of the forecast series a sample is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Timestep {
    #[default]
    Minutely,
    Hourly,
    Daily,
}

impl Timestep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timestep::Minutely => "minutely",
            Timestep::Hourly => "hourly",
            Timestep::Daily => "daily",
        }
    }

    /// Tomorrow.io `timesteps` query value.
    pub fn query_value(&self) -> &'static str {
        match self {
            Timestep::Minutely => "1m",
            Timestep::Hourly => "1h",
            Timestep::Daily => "1d",
        }
    }
}

impl fmt::Display for Timestep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timestep {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minutely" | "1m" => Ok(Timestep::Minutely),
            "hourly" | "1h" => Ok(Timestep::Hourly),
            "daily" | "1d" => Ok(Timestep::Daily),
            other => Err(WeatherError::InvalidInput(format!(
                "unknown timestep '{other}' (expected minutely, hourly or daily)"
            ))),
        }
    }
}

/// One timestamped bundle of weather values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub timestamp: DateTime<Utc>,
    /// °C
    pub temperature: f64,
    pub apparent_temperature: Option<f64>,
    /// Relative humidity, %
    pub humidity: f64,
    /// m/s
    pub wind_speed: f64,
    /// hPa
    pub pressure: Option<f64>,
    pub uv_index: Option<f64>,
    /// km
    pub visibility: Option<f64>,
    /// %
    pub precipitation_probability: Option<f64>,
    pub weather_code: i64,
}

impl WeatherSample {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_code(self.weather_code)
    }
}

/// Result of a successful run, handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub coordinates: Coordinates,
    pub timestep: Timestep,
    pub sample: WeatherSample,
    pub condition: WeatherCondition,
}

impl WeatherReport {
    pub fn new(
        location: String,
        coordinates: Coordinates,
        timestep: Timestep,
        sample: WeatherSample,
    ) -> Self {
        let condition = sample.condition();
        Self {
            location,
            coordinates,
            timestep,
            sample,
            condition,
        }
    }
}
