use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::WeatherError,
    http::{parse_json, success_body},
    model::Coordinates,
    service::ServiceId,
};

use super::{Candidate, Geocoder};

/// Forward geocoding through the OpenCage API.
#[derive(Debug, Clone)]
pub struct OpenCageGeocoder {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenCageGeocoder {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: ServiceId::OpenCage.default_base_url().to_string(),
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

#[derive(Debug, Deserialize)]
struct OcResponse {
    results: Vec<OcResult>,
}

#[derive(Debug, Deserialize)]
struct OcResult {
    geometry: OcGeometry,
    #[serde(default)]
    formatted: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OcGeometry {
    lat: f64,
    lng: f64,
}

impl From<OcResult> for Candidate {
    fn from(result: OcResult) -> Self {
        Candidate {
            coordinates: Coordinates::new(result.geometry.lat, result.geometry.lng),
            formatted: result.formatted,
        }
    }
}

#[async_trait]
impl Geocoder for OpenCageGeocoder {
    #[instrument(skip(self), level = "debug")]
    async fn lookup(&self, query: &str) -> Result<Vec<Candidate>, WeatherError> {
        let url = format!("{}/geocode/v1/json", self.base_url.trim_end_matches('/'));

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("key", self.api_key.as_str()),
                ("limit", "1"),
                ("no_annotations", "1"),
            ])
            .send()
            .await
            .map_err(|source| WeatherError::Transport {
                service: ServiceId::OpenCage,
                source,
            })?;

        let body = success_body(ServiceId::OpenCage, res).await?;
        let parsed: OcResponse = parse_json(ServiceId::OpenCage, &body)?;

        tracing::debug!(candidates = parsed.results.len(), "geocoding finished");
        Ok(parsed.results.into_iter().map(Candidate::from).collect())
    }
}
