//! Turning a [`LocationRequest`] into [`Coordinates`].
//!
//! Each way of acquiring a location is a [`LocationSource`]:
//! - [`ByName`] geocodes a free-text place name, keeping only the first candidate
//! - [`ByDevice`] asks the device location sensor
//! - [`ByPoint`] passes a directly picked point through unchanged
//!
//! [`LocationResolver`] owns the collaborators and picks the source for a request.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{Coordinates, LocationRequest},
    service::ServiceId,
};

pub mod device;
pub mod geocode;

pub use device::{IpLocator, NoDeviceSensor};
pub use geocode::OpenCageGeocoder;

/// One geocoding result.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub coordinates: Coordinates,
    pub formatted: Option<String>,
}

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Candidates for `query`, best match first.
    async fn lookup(&self, query: &str) -> Result<Vec<Candidate>, WeatherError>;
}

#[async_trait]
pub trait DeviceLocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, WeatherError>;
}

#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    async fn acquire(&self) -> Result<Coordinates, WeatherError>;
}

/// Place name resolved through a [`Geocoder`].
#[derive(Debug)]
pub struct ByName<'a> {
    geocoder: &'a dyn Geocoder,
    query: String,
}

impl<'a> ByName<'a> {
    /// Fails with [`WeatherError::InvalidInput`] for empty or whitespace-only names.
    pub fn new(geocoder: &'a dyn Geocoder, name: &str) -> Result<Self, WeatherError> {
        Ok(Self {
            geocoder,
            query: normalize_query(name)?.to_string(),
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

#[async_trait]
impl<'a> LocationSource for ByName<'a> {
    async fn acquire(&self) -> Result<Coordinates, WeatherError> {
        let candidates = self.geocoder.lookup(&self.query).await?;
        let first = candidates
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NotFound(self.query.clone()))?;

        tracing::debug!(
            query = %self.query,
            formatted = first.formatted.as_deref().unwrap_or_default(),
            coordinates = %first.coordinates,
            "geocoded place name"
        );
        Ok(first.coordinates)
    }
}

/// Location reported by the device sensor.
#[derive(Debug)]
pub struct ByDevice<'a> {
    locator: &'a dyn DeviceLocator,
}

impl<'a> ByDevice<'a> {
    pub fn new(locator: &'a dyn DeviceLocator) -> Self {
        Self { locator }
    }
}

#[async_trait]
impl<'a> LocationSource for ByDevice<'a> {
    async fn acquire(&self) -> Result<Coordinates, WeatherError> {
        self.locator.locate().await
    }
}

/// A point picked directly by the user.
#[derive(Debug, Clone, Copy)]
pub struct ByPoint {
    coordinates: Coordinates,
}

impl ByPoint {
    /// Rejects non-finite and out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, WeatherError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherError::InvalidInput(format!(
                "latitude {latitude} is outside -90..=90"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidInput(format!(
                "longitude {longitude} is outside -180..=180"
            )));
        }

        Ok(Self {
            coordinates: Coordinates::new(latitude, longitude),
        })
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }
}

#[async_trait]
impl LocationSource for ByPoint {
    async fn acquire(&self) -> Result<Coordinates, WeatherError> {
        Ok(self.coordinates)
    }
}

/// Entry point for the "acquire coordinates" step.
#[derive(Debug)]
pub struct LocationResolver {
    geocoder: Option<Box<dyn Geocoder>>,
    device: Box<dyn DeviceLocator>,
}

impl LocationResolver {
    /// `geocoder` is optional so that device and point lookups work without
    /// geocoding credentials.
    pub fn new(geocoder: Option<Box<dyn Geocoder>>, device: Box<dyn DeviceLocator>) -> Self {
        Self { geocoder, device }
    }

    pub async fn resolve_by_name(&self, name: &str) -> Result<Coordinates, WeatherError> {
        self.source(&LocationRequest::Name(name.to_string()))?
            .acquire()
            .await
    }

    pub async fn resolve_by_device(&self) -> Result<Coordinates, WeatherError> {
        ByDevice::new(self.device.as_ref()).acquire().await
    }

    pub fn resolve_by_point(&self, latitude: f64, longitude: f64) -> Result<Coordinates, WeatherError> {
        ByPoint::new(latitude, longitude).map(|point| point.coordinates())
    }

    pub async fn resolve(&self, request: &LocationRequest) -> Result<Coordinates, WeatherError> {
        self.source(request)?.acquire().await
    }

    /// Build the source for `request`. Input is validated here, before any
    /// collaborator is touched.
    pub fn source<'a>(
        &'a self,
        request: &LocationRequest,
    ) -> Result<Box<dyn LocationSource + 'a>, WeatherError> {
        let source: Box<dyn LocationSource + 'a> = match request {
            LocationRequest::Name(name) => {
                let query = normalize_query(name)?;
                let geocoder = self
                    .geocoder
                    .as_deref()
                    .ok_or(WeatherError::MissingApiKey(ServiceId::OpenCage))?;
                Box::new(ByName::new(geocoder, query)?)
            }
            LocationRequest::Device => Box::new(ByDevice::new(self.device.as_ref())),
            LocationRequest::Point { latitude, longitude } => {
                Box::new(ByPoint::new(*latitude, *longitude)?)
            }
        };

        Ok(source)
    }
}

fn normalize_query(name: &str) -> Result<&str, WeatherError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(WeatherError::InvalidInput(
            "location name must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct FakeGeocoder {
        candidates: Vec<Candidate>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn lookup(&self, _query: &str) -> Result<Vec<Candidate>, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.candidates.clone())
        }
    }

    #[derive(Debug)]
    struct FixedDevice(Coordinates);

    #[async_trait]
    impl DeviceLocator for FixedDevice {
        async fn locate(&self) -> Result<Coordinates, WeatherError> {
            Ok(self.0)
        }
    }

    fn candidate(lat: f64, lng: f64, name: &str) -> Candidate {
        Candidate {
            coordinates: Coordinates::new(lat, lng),
            formatted: Some(name.to_string()),
        }
    }

    #[tokio::test]
    async fn empty_names_fail_before_lookup() {
        let geocoder = FakeGeocoder::default();

        for name in ["", "   ", "\t\n"] {
            let err = ByName::new(&geocoder, name).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Input);
        }
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn first_candidate_wins() {
        let geocoder = FakeGeocoder {
            candidates: vec![
                candidate(51.5, -0.12, "London, UK"),
                candidate(42.98, -81.24, "London, Canada"),
            ],
            ..Default::default()
        };

        let coords = ByName::new(&geocoder, " London ").unwrap().acquire().await.unwrap();
        assert_eq!(coords, Coordinates::new(51.5, -0.12));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_candidates_is_not_found() {
        let geocoder = FakeGeocoder::default();
        let source = ByName::new(&geocoder, "Atlantis").unwrap();

        let err = source.acquire().await.unwrap_err();
        assert!(matches!(err, WeatherError::NotFound(ref q) if q == "Atlantis"));
    }

    #[tokio::test]
    async fn point_passes_through() {
        let resolver = LocationResolver::new(None, Box::new(NoDeviceSensor::default()));
        let coords = resolver.resolve_by_point(-33.87, 151.21).unwrap();
        assert_eq!(coords, Coordinates::new(-33.87, 151.21));

        let coords = resolver
            .resolve(&LocationRequest::Point { latitude: 90.0, longitude: -180.0 })
            .await
            .unwrap();
        assert_eq!(coords, Coordinates::new(90.0, -180.0));
    }

    #[test]
    fn point_rejects_out_of_range() {
        assert!(ByPoint::new(90.5, 0.0).is_err());
        assert!(ByPoint::new(0.0, 181.0).is_err());
        assert!(ByPoint::new(f64::NAN, 0.0).is_err());
        assert!(ByPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[tokio::test]
    async fn name_without_geocoder_is_config_error() {
        let resolver = LocationResolver::new(None, Box::new(NoDeviceSensor::default()));

        let err = resolver.resolve_by_name("Paris").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        // Input validation still comes first.
        let err = resolver.resolve_by_name("  ").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[tokio::test]
    async fn device_requests_use_the_locator() {
        let resolver = LocationResolver::new(
            None,
            Box::new(FixedDevice(Coordinates::new(48.85, 2.35))),
        );

        let coords = resolver.resolve(&LocationRequest::Device).await.unwrap();
        assert_eq!(coords, Coordinates::new(48.85, 2.35));
    }

    #[tokio::test]
    async fn missing_sensor_is_unsupported() {
        let resolver = LocationResolver::new(None, Box::new(NoDeviceSensor::default()));
        let err = resolver.resolve_by_device().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }
}
