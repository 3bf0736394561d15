//! Orchestration: acquire coordinates, fetch the forecast, publish the result.
//!
//! The flow owns the single [`RequestState`] cell. Every call to
//! [`WeatherFlow::run`] takes a ticket from a generation counter; only the
//! holder of the newest ticket may write the state, so a slow, superseded
//! request can never overwrite the result of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Client;
use tokio::sync::watch;
use tracing::instrument;

use crate::{
    config::Config,
    error::{Failure, WeatherError},
    forecast::{ForecastProvider, TomorrowProvider},
    location::{
        DeviceLocator, Geocoder, IpLocator, LocationResolver, NoDeviceSensor, OpenCageGeocoder,
    },
    model::{LocationRequest, Timestep, WeatherReport},
    service::ServiceId,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(WeatherReport),
    Failed(Failure),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        match self {
            RequestState::Success(report) => Some(report),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            RequestState::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct WeatherFlow {
    resolver: LocationResolver,
    forecast: Box<dyn ForecastProvider>,
    timestep: Timestep,
    generation: AtomicU64,
    state: watch::Sender<RequestState>,
}

impl WeatherFlow {
    pub fn new(resolver: LocationResolver, forecast: Box<dyn ForecastProvider>) -> Self {
        let (state, _) = watch::channel(RequestState::Idle);
        Self {
            resolver,
            forecast,
            timestep: Timestep::default(),
            generation: AtomicU64::new(0),
            state,
        }
    }

    /// Wire the public services from configuration.
    ///
    /// The forecast key is required. Without a geocoder key, name lookups
    /// fail with [`WeatherError::MissingApiKey`] while device and point
    /// lookups keep working.
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let http = http_client(config)?;

        let forecast_key = config
            .api_key(ServiceId::Tomorrow)
            .ok_or(WeatherError::MissingApiKey(ServiceId::Tomorrow))?;
        let forecast = TomorrowProvider::new(forecast_key.to_owned())
            .with_base_url(config.base_url(ServiceId::Tomorrow))
            .with_client(http.clone());

        let geocoder = config.api_key(ServiceId::OpenCage).map(|key| {
            Box::new(
                OpenCageGeocoder::new(key.to_owned())
                    .with_base_url(config.base_url(ServiceId::OpenCage))
                    .with_client(http.clone()),
            ) as Box<dyn Geocoder>
        });

        let device: Box<dyn DeviceLocator> = if config.device.enabled {
            Box::new(IpLocator::new(
                config.device.endpoint.clone(),
                config.device.timeout(),
            )?)
        } else {
            Box::new(NoDeviceSensor::new(
                "device location is disabled in the configuration",
            ))
        };

        let flow = Self::new(LocationResolver::new(geocoder, device), Box::new(forecast))
            .with_timestep(config.timestep());
        Ok(flow)
    }

    /// Series the flow samples from.
    pub fn with_timestep(mut self, timestep: Timestep) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn timestep(&self) -> Timestep {
        self.timestep
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> RequestState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every committed state change.
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    /// Resolve `request`, fetch its forecast and commit the outcome.
    ///
    /// The outcome is always returned to the caller, but it only reaches the
    /// shared state if no newer run has started in the meantime.
    #[instrument(skip(self), level = "info")]
    pub async fn run(&self, request: LocationRequest) -> Result<WeatherReport, Failure> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.commit(ticket, RequestState::Loading);

        let outcome = self.resolve_and_fetch(&request).await;

        let next = match &outcome {
            Ok(report) => {
                tracing::info!(
                    location = %report.location,
                    condition = %report.condition,
                    "weather fetched"
                );
                RequestState::Success(report.clone())
            }
            Err(err) => {
                tracing::warn!(error = %err, kind = ?err.kind(), "weather request failed");
                RequestState::Failed(Failure::from(err))
            }
        };

        if !self.commit(ticket, next) {
            tracing::debug!(ticket, "newer request in flight, result not committed");
        }

        outcome.map_err(|err| Failure::from(&err))
    }

    async fn resolve_and_fetch(
        &self,
        request: &LocationRequest,
    ) -> Result<WeatherReport, WeatherError> {
        let coordinates = self.resolver.resolve(request).await?;
        let sample = self.forecast.fetch(coordinates, self.timestep).await?;

        Ok(WeatherReport::new(
            request.describe(),
            coordinates,
            self.timestep,
            sample,
        ))
    }

    /// Write `next` if `ticket` is still the newest. Returns whether it was written.
    fn commit(&self, ticket: u64, next: RequestState) -> bool {
        self.state.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != ticket {
                return false;
            }
            *current = next;
            true
        })
    }
}

fn http_client(config: &Config) -> Result<Client, WeatherError> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(WeatherError::HttpClient)
}
