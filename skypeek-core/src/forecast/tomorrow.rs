use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::WeatherError,
    http::{parse_json, success_body},
    model::{Coordinates, Timestep, WeatherSample},
    service::ServiceId,
};

use super::ForecastProvider;

/// Tomorrow.io `/v4/weather/forecast` client.
#[derive(Debug, Clone)]
pub struct TomorrowProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl TomorrowProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: ServiceId::Tomorrow.default_base_url().to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }
}

// Series entries are kept as raw JSON so that only the chosen series'
// first entry has to be well-formed.
#[derive(Debug, Deserialize)]
struct TmForecastResponse {
    timelines: TmTimelines,
}

#[derive(Debug, Deserialize)]
struct TmTimelines {
    #[serde(default)]
    minutely: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    hourly: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    daily: Option<Vec<serde_json::Value>>,
}

impl TmTimelines {
    fn series(&self, timestep: Timestep) -> Option<&[serde_json::Value]> {
        match timestep {
            Timestep::Minutely => self.minutely.as_deref(),
            Timestep::Hourly => self.hourly.as_deref(),
            Timestep::Daily => self.daily.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TmInterval {
    time: DateTime<Utc>,
    values: TmValues,
}

// Daily entries carry aggregates (`temperatureAvg`, `weatherCodeMax`, ...)
// instead of point values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TmValues {
    #[serde(alias = "temperatureAvg")]
    temperature: f64,
    #[serde(default, alias = "temperatureApparentAvg")]
    temperature_apparent: Option<f64>,
    #[serde(alias = "humidityAvg")]
    humidity: f64,
    #[serde(alias = "windSpeedAvg")]
    wind_speed: f64,
    #[serde(default, alias = "pressureSurfaceLevelAvg")]
    pressure_surface_level: Option<f64>,
    #[serde(default, alias = "uvIndexAvg")]
    uv_index: Option<f64>,
    #[serde(default, alias = "visibilityAvg")]
    visibility: Option<f64>,
    #[serde(default, alias = "precipitationProbabilityAvg")]
    precipitation_probability: Option<f64>,
    #[serde(alias = "weatherCodeMax")]
    weather_code: i64,
}

impl From<TmInterval> for WeatherSample {
    fn from(interval: TmInterval) -> Self {
        let v = interval.values;
        WeatherSample {
            timestamp: interval.time,
            temperature: v.temperature,
            apparent_temperature: v.temperature_apparent,
            humidity: v.humidity,
            wind_speed: v.wind_speed,
            pressure: v.pressure_surface_level,
            uv_index: v.uv_index,
            visibility: v.visibility,
            precipitation_probability: v.precipitation_probability,
            weather_code: v.weather_code,
        }
    }
}

/// Decode the first entry of the `timestep` series from a forecast body.
fn first_sample(body: &str, timestep: Timestep) -> Result<WeatherSample, WeatherError> {
    let parsed: TmForecastResponse = parse_json(ServiceId::Tomorrow, body)?;

    let series = parsed.timelines.series(timestep).ok_or_else(|| {
        WeatherError::parse(
            ServiceId::Tomorrow,
            format!("response has no {timestep} timeline"),
        )
    })?;

    let first = series.first().ok_or_else(|| {
        WeatherError::parse(ServiceId::Tomorrow, format!("{timestep} timeline is empty"))
    })?;

    let interval = TmInterval::deserialize(first).map_err(|e| {
        WeatherError::parse(
            ServiceId::Tomorrow,
            format!("malformed {timestep} entry: {e}"),
        )
    })?;

    Ok(interval.into())
}

#[async_trait]
impl ForecastProvider for TomorrowProvider {
    #[instrument(skip(self), level = "debug")]
    async fn fetch(
        &self,
        coordinates: Coordinates,
        timestep: Timestep,
    ) -> Result<WeatherSample, WeatherError> {
        let url = format!("{}/v4/weather/forecast", self.base_url.trim_end_matches('/'));

        let res = self
            .http
            .get(&url)
            .query(&[
                ("location", coordinates.to_query().as_str()),
                ("timesteps", timestep.query_value()),
                ("units", "metric"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|source| WeatherError::Transport {
                service: ServiceId::Tomorrow,
                source,
            })?;

        let body = success_body(ServiceId::Tomorrow, res).await?;
        let sample = first_sample(&body, timestep)?;

        tracing::debug!(time = %sample.timestamp, code = sample.weather_code, "forecast sample selected");
        Ok(sample)
    }
}
