//! Integration tests for TomorrowProvider using wiremock.

use skypeek_core::{Coordinates, ErrorKind, ForecastProvider, Timestep, TomorrowProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> TomorrowProvider {
    TomorrowProvider::new("TM_KEY".to_string()).with_base_url(server.uri())
}

fn interval(time: &str, temperature: f64, code: i64) -> serde_json::Value {
    serde_json::json!({
        "time": time,
        "values": {
            "temperature": temperature,
            "humidity": 80,
            "windSpeed": 3,
            "weatherCode": code
        }
    })
}

#[tokio::test]
async fn test_fetch_sends_coordinates_and_timestep() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/weather/forecast"))
        .and(query_param("location", "51.5,-0.12"))
        .and(query_param("timesteps", "1h"))
        .and(query_param("units", "metric"))
        .and(query_param("apikey", "TM_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "timelines": {
                "hourly": [
                    interval("2024-03-01T12:00:00Z", 7.5, 4200),
                    interval("2024-03-01T13:00:00Z", 8.0, 4001)
                ]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sample = provider(&mock_server)
        .fetch(Coordinates::new(51.5, -0.12), Timestep::Hourly)
        .await
        .unwrap();

    assert_eq!(sample.temperature, 7.5);
    assert_eq!(sample.weather_code, 4200);
    assert_eq!(sample.condition().label(), "Light Rain");
}

#[tokio::test]
async fn test_fetch_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/weather/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server)
        .fetch(Coordinates::new(0.0, 0.0), Timestep::Minutely)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_fetch_empty_series_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/weather/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "timelines": {
                "minutely": [],
                "hourly": [interval("2024-03-01T12:00:00Z", 7.5, 1000)]
            }
        })))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server)
        .fetch(Coordinates::new(0.0, 0.0), Timestep::Minutely)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn test_fetch_unreachable_is_network_error() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let err = TomorrowProvider::new("TM_KEY".to_string())
        .with_base_url(uri)
        .fetch(Coordinates::new(0.0, 0.0), Timestep::Minutely)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
}
