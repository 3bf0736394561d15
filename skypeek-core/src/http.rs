//! Response handling shared by the service clients.

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::{error::WeatherError, service::ServiceId};

/// Read the body of `response`, failing with [`WeatherError::Status`] on a
/// non-success status.
pub(crate) async fn success_body(
    service: ServiceId,
    response: Response,
) -> Result<String, WeatherError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| WeatherError::Transport { service, source })?;

    if !status.is_success() {
        return Err(WeatherError::Status {
            service,
            status,
            body: truncate_body(&body),
        });
    }

    tracing::debug!(%service, %status, bytes = body.len(), "response received");
    Ok(body)
}

pub(crate) fn parse_json<T: DeserializeOwned>(
    service: ServiceId,
    body: &str,
) -> Result<T, WeatherError> {
    serde_json::from_str(body).map_err(|e| WeatherError::parse(service, e.to_string()))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn long_bodies_are_truncated_on_char_boundary() {
        let body = "é".repeat(150);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }

    #[test]
    fn parse_errors_name_the_service() {
        let err = parse_json::<serde_json::Value>(ServiceId::OpenCage, "not json").unwrap_err();
        assert!(err.to_string().contains("opencage"));
    }
}
