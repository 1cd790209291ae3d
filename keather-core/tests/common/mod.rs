//! Shared fixtures for the OpenWeather integration tests.

#![allow(dead_code)]

use keather_core::{Units, WeatherProvider, provider::openweather::OpenWeatherProvider};
use serde_json::{Value, json};

pub const API_KEY: &str = "test-key";

pub fn provider(base_url: &str) -> Box<dyn WeatherProvider> {
    provider_with_timeout(base_url, 5)
}

pub fn provider_with_timeout(base_url: &str, timeout_secs: u64) -> Box<dyn WeatherProvider> {
    let provider = OpenWeatherProvider::builder(API_KEY.to_string())
        .units(Units::Metric)
        .base_url(base_url)
        .timeout_secs(timeout_secs)
        .build()
        .expect("provider construction should not fail");
    Box::new(provider)
}

pub fn current_body(city: &str, main: &str, description: &str) -> Value {
    json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [
            { "id": 500, "main": main, "description": description, "icon": "10d" }
        ],
        "base": "stations",
        "main": {
            "temp": 11.62,
            "feels_like": 10.9,
            "temp_min": 10.3,
            "temp_max": 12.8,
            "pressure": 1009,
            "humidity": 82
        },
        "visibility": 10000,
        "wind": { "speed": 4.63, "deg": 240 },
        "clouds": { "all": 75 },
        "dt": 1714561200,
        "sys": {
            "type": 2,
            "id": 2075535,
            "country": "GB",
            "sunrise": 1714538040,
            "sunset": 1714592100
        },
        "timezone": 3600,
        "id": 2643743,
        "name": city,
        "cod": 200
    })
}

/// Three-hourly forecast for `days` days starting 2024-05-01 00:00 UTC.
pub fn forecast_body(city: &str, days: i64) -> Value {
    let start = 1714521600_i64; // 2024-05-01 00:00:00 UTC
    let list: Vec<Value> = (0..days * 8)
        .map(|i| {
            let dt = start + i * 3 * 3600;
            let dt_txt = chrono::DateTime::from_timestamp(dt, 0)
                .expect("fixture timestamps are valid")
                .format("%Y-%m-%d %H:%M:%S")
                .to_string();
            let main = if i % 2 == 0 { "Clear" } else { "Clouds" };
            json!({
                "dt": dt,
                "main": { "temp": 10.0 + i as f64, "humidity": 70 },
                "weather": [ { "id": 800, "main": main, "description": "x", "icon": "01d" } ],
                "wind": { "speed": 3.2 },
                "dt_txt": dt_txt
            })
        })
        .collect();

    json!({
        "cod": "200",
        "message": 0,
        "cnt": list.len(),
        "list": list,
        "city": { "id": 2643743, "name": city, "country": "GB" }
    })
}

pub fn geo_body() -> Value {
    json!([
        { "name": "London", "lat": 51.5073, "lon": -0.1276, "country": "GB", "state": "England" },
        { "name": "London", "lat": 42.9832, "lon": -81.2433, "country": "CA", "state": "Ontario" },
        { "name": "London", "lat": 39.8865, "lon": -83.4483, "country": "US", "state": "Ohio" }
    ])
}

pub fn not_found_body() -> Value {
    json!({ "cod": "404", "message": "city not found" })
}
