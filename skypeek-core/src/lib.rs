//! Core library for the `skypeek` CLI.
//!
//! This crate defines:
//! - Weather code classification
//! - Location resolution (place name, device sensor, picked point)
//! - Forecast lookup and the request state machine tying it together
//! - Configuration & credentials handling
//!
//! It is used by `skypeek-cli`, but can also be reused by other front ends.

pub mod condition;
pub mod config;
pub mod error;
pub mod flow;
pub mod forecast;
mod http;
pub mod location;
pub mod model;
pub mod service;

pub use condition::{WeatherCondition, classify};
pub use config::{Config, DeviceConfig, ServiceConfig};
pub use error::{ErrorKind, Failure, WeatherError};
pub use flow::{RequestState, WeatherFlow};
pub use forecast::{ForecastProvider, TomorrowProvider};
pub use location::{
    Candidate, DeviceLocator, Geocoder, IpLocator, LocationResolver, LocationSource,
    NoDeviceSensor, OpenCageGeocoder,
};
pub use model::{Coordinates, LocationRequest, Timestep, WeatherReport, WeatherSample};
pub use service::ServiceId;
