use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::{
    error::WeatherError,
    http::{parse_json, success_body},
    model::Coordinates,
    service::ServiceId,
};

use super::DeviceLocator;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Device location from the host's public IP address (ipapi.co format).
///
/// A refused lookup (HTTP 401/403) or a timeout is reported as
/// [`WeatherError::PermissionDenied`]; a host the service cannot place is
/// [`WeatherError::Unsupported`].
#[derive(Debug, Clone)]
pub struct IpLocator {
    endpoint: String,
    http: Client,
}

impl IpLocator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| WeatherError::Transport {
                service: ServiceId::IpApi,
                source,
            })?;

        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
}

#[async_trait]
impl DeviceLocator for IpLocator {
    #[instrument(skip(self), level = "debug")]
    async fn locate(&self) -> Result<Coordinates, WeatherError> {
        let url = format!("{}/json/", self.endpoint.trim_end_matches('/'));

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| timeout_as_denied(WeatherError::Transport {
                service: ServiceId::IpApi,
                source,
            }))?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(WeatherError::PermissionDenied(format!(
                "location lookup refused (HTTP {})",
                status.as_u16()
            )));
        }

        let body = success_body(ServiceId::IpApi, res)
            .await
            .map_err(timeout_as_denied)?;
        let parsed: IpApiResponse = parse_json(ServiceId::IpApi, &body)?;

        if parsed.error {
            return Err(WeatherError::Unsupported(
                parsed
                    .reason
                    .unwrap_or_else(|| "this host could not be located".to_string()),
            ));
        }

        match (parsed.latitude, parsed.longitude) {
            (Some(latitude), Some(longitude)) => {
                tracing::debug!(city = parsed.city.as_deref().unwrap_or_default(), "device located");
                Ok(Coordinates::new(latitude, longitude))
            }
            _ => Err(WeatherError::parse(
                ServiceId::IpApi,
                "response has no latitude/longitude",
            )),
        }
    }
}

fn timeout_as_denied(err: WeatherError) -> WeatherError {
    match err {
        WeatherError::Transport { source, .. } if source.is_timeout() => {
            WeatherError::PermissionDenied("location lookup timed out".to_string())
        }
        other => other,
    }
}

/// Locator for hosts without a location sensor.
#[derive(Debug, Clone)]
pub struct NoDeviceSensor {
    reason: String,
}

impl NoDeviceSensor {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for NoDeviceSensor {
    fn default() -> Self {
        Self::new("no location sensor is available on this host")
    }
}

#[async_trait]
impl DeviceLocator for NoDeviceSensor {
    async fn locate(&self) -> Result<Coordinates, WeatherError> {
        Err(WeatherError::Unsupported(self.reason.clone()))
    }
}
