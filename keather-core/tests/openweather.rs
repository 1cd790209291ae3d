//! Integration tests for `OpenWeatherProvider` using wiremock HTTP mocks.

mod common;

use chrono::{TimeZone, Utc};
use std::time::{Duration, Instant};
use keather_core::{Condition, WeatherError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{
    API_KEY, current_body, forecast_body, geo_body, not_found_body, provider,
    provider_with_timeout,
};

#[tokio::test]
async fn current_weather_returns_parsed_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", API_KEY))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(current_body("London", "Rain", "light rain")),
        )
        .mount(&server)
        .await;

    let current = provider(&server.uri())
        .current_weather("London")
        .await
        .expect("should parse current weather");

    assert_eq!(current.condition, Condition::Rain);
    assert_eq!(current.description, "light rain");
    assert_eq!(current.temperature, 11.62);
    assert_eq!(current.humidity_pct, 82);
    assert_eq!(current.wind_speed, 4.63);
    assert_eq!(current.sunrise, Some(Utc.with_ymd_and_hms(2024, 5, 1, 4, 34, 0).unwrap()));

    let place = current.place.expect("location should be present");
    assert_eq!(place.to_string(), "London, GB");
}

#[tokio::test]
async fn current_weather_without_location_fields() {
    let server = MockServer::start().await;

    let mut body = current_body("", "Clear", "clear sky");
    body.as_object_mut().expect("object").remove("sys");

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let current = provider(&server.uri()).current_weather("Nowhere").await.expect("parses");
    assert!(current.place.is_none());
    assert!(current.sunrise.is_none());
}

#[tokio::test]
async fn current_weather_not_found_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
        .mount(&server)
        .await;

    let err = provider(&server.uri()).current_weather("Atlantis").await.unwrap_err();

    assert!(matches!(err, WeatherError::Provider { .. }));
    assert_eq!(err.provider_code(), Some("404"));
    assert!(err.to_string().contains("city not found"));
}

#[tokio::test]
async fn current_weather_malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("{\"cod\":200,\"name\":\"London\"}"),
        )
        .mount(&server)
        .await;

    let err = provider(&server.uri()).current_weather("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::Parse { .. }));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    // Nothing listens on port 1.
    let err = provider("http://127.0.0.1:1").current_weather("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::Transport { .. }));
}

#[tokio::test]
async fn slow_response_times_out_as_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body("London", "Rain", "light rain"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let started = Instant::now();
    let err = provider_with_timeout(&server.uri(), 1)
        .current_weather("London")
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Transport { .. }));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn daily_forecast_keeps_one_noon_point_per_day() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "London"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("London", 5)))
        .mount(&server)
        .await;

    let points = provider(&server.uri()).daily_forecast("London").await.expect("forecast");

    assert_eq!(points.len(), 5);
    for (day, point) in points.iter().enumerate() {
        assert!(point.time_text.ends_with("12:00:00"), "{}", point.time_text);
        assert_eq!(
            point.time,
            Utc.with_ymd_and_hms(2024, 5, 1 + day as u32, 12, 0, 0).unwrap()
        );
    }
    assert_eq!(points[0].temperature, 14.0);
    assert_eq!(points[0].condition, Condition::Clear);
}

#[tokio::test]
async fn daily_forecast_error_code_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key."
        })))
        .mount(&server)
        .await;

    let err = provider(&server.uri()).daily_forecast("London").await.unwrap_err();
    assert_eq!(err.provider_code(), Some("401"));
}

#[tokio::test]
async fn city_suggestions_requests_five_and_maps_entries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Lon"))
        .and(query_param("limit", "5"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(geo_body()))
        .expect(1)
        .mount(&server)
        .await;

    let suggestions = provider(&server.uri()).city_suggestions("Lon").await.expect("suggestions");

    assert_eq!(suggestions.len(), 3);
    assert_eq!(suggestions[0].name, "London");
    assert_eq!(suggestions[1].country, "CA");
    assert_eq!(suggestions[1].state.as_deref(), Some("Ontario"));
    assert_eq!(suggestions[2].to_string(), "London, Ohio, US");
}

#[tokio::test]
async fn blank_suggestion_query_skips_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geo_body()))
        .expect(0)
        .mount(&server)
        .await;

    let provider = provider(&server.uri());
    assert!(provider.city_suggestions("").await.expect("empty").is_empty());
    assert!(provider.city_suggestions("   ").await.expect("empty").is_empty());
}
