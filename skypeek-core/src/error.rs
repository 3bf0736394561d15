//! Error taxonomy for location resolution and forecast lookup.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::service::ServiceId;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No location found for '{0}'")]
    NotFound(String),

    #[error("Device location is not supported: {0}")]
    Unsupported(String),

    #[error("Device location permission denied: {0}")]
    PermissionDenied(String),

    #[error("{service} request failed with status {status}: {body}")]
    Status {
        service: ServiceId,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to send request to {service}: {source}")]
    Transport {
        service: ServiceId,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Failed to parse {service} response: {message}")]
    Parse { service: ServiceId, message: String },

    #[error(
        "No API key configured for service '{0}'.\n\
         Hint: run `skypeek configure {0}` or set the {env} environment variable.",
        env = .0.api_key_env()
    )]
    MissingApiKey(ServiceId),
}

/// Coarse classification of a [`WeatherError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Input,
    NotFound,
    Unsupported,
    Permission,
    Network,
    Parse,
    Config,
}

impl WeatherError {
    pub fn parse(service: ServiceId, message: impl Into<String>) -> Self {
        Self::Parse {
            service,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::Input,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::PermissionDenied(_) => ErrorKind::Permission,
            Self::Status { .. } | Self::Transport { .. } => ErrorKind::Network,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::MissingApiKey(_) | Self::HttpClient(_) => ErrorKind::Config,
        }
    }

    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg) => format!("Please check your input: {msg}"),
            Self::NotFound(query) => format!("Couldn't find a place called '{query}'."),
            Self::Unsupported(_) => "Location detection is not available on this device.".to_string(),
            Self::PermissionDenied(_) => "Unable to get your location.".to_string(),
            Self::Status { service, status, .. } => format!(
                "Unable to fetch data from {} (HTTP {}).",
                service.display_name(),
                status.as_u16()
            ),
            Self::Transport { service, .. } => format!(
                "Couldn't reach {}. Check your connection.",
                service.display_name()
            ),
            Self::HttpClient(_) => "Couldn't set up the network client.".to_string(),
            Self::Parse { service, .. } => {
                format!("{} returned data in an unexpected format.", service.display_name())
            }
            Self::MissingApiKey(service) => format!(
                "No API key for {}. Run `skypeek configure {}` first.",
                service.display_name(),
                service
            ),
        }
    }
}

/// Cloneable summary of a failed run, as held in the request state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&WeatherError> for Failure {
    fn from(err: &WeatherError) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Failure {}
