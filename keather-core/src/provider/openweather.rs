use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use std::{fmt, time::Duration};

use crate::{
    condition::Condition,
    config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
    error::WeatherError,
    model::{CurrentWeather, ForecastPoint, Place, Suggestion, Units, daily_points},
};

use super::{SUGGESTION_LIMIT, WeatherProvider};

const CURRENT_PATH: &str = "data/2.5/weather";
const FORECAST_PATH: &str = "data/2.5/forecast";
const GEOCODE_PATH: &str = "geo/1.0/direct";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    units: Units,
    http: Client,
    current_url: Url,
    forecast_url: Url,
    geocode_url: Url,
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProviderBuilder {
    api_key: String,
    units: Units,
    base_url: String,
    timeout_secs: u64,
}

impl OpenWeatherProviderBuilder {
    pub fn units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Point the provider somewhere other than api.openweathermap.org,
    /// e.g. a mock server in tests.
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn build(self) -> Result<OpenWeatherProvider> {
        // Exactly one trailing slash so joins append instead of replacing the
        // last path segment.
        let normalised = format!("{}/", self.base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised)
            .with_context(|| format!("Invalid base URL '{}'", self.base_url))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let join = |path: &str| {
            base.join(path)
                .map_err(|e| anyhow!("Invalid base URL '{}': {e}", self.base_url))
        };

        Ok(OpenWeatherProvider {
            current_url: join(CURRENT_PATH)?,
            forecast_url: join(FORECAST_PATH)?,
            geocode_url: join(GEOCODE_PATH)?,
            api_key: self.api_key,
            units: self.units,
            http,
        })
    }
}

impl OpenWeatherProvider {
    pub fn builder(api_key: String) -> OpenWeatherProviderBuilder {
        OpenWeatherProviderBuilder {
            api_key,
            units: Units::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        let parsed: OwCurrentResponse = self
            .get_json(
                "current weather",
                &self.current_url,
                &[
                    ("q", city),
                    ("units", self.units.as_str()),
                    ("appid", self.api_key.as_str()),
                ],
            )
            .await?;

        let (condition, description) = match parsed.weather.into_iter().next() {
            Some(w) => (Condition::from_main(&w.main), w.description),
            None => (Condition::Other("Unknown".to_string()), "Unknown".to_string()),
        };

        let sys = parsed.sys.unwrap_or_default();
        let place = match (parsed.name, sys.country) {
            (Some(name), Some(country)) if !name.is_empty() => Some(Place { name, country }),
            _ => None,
        };

        Ok(CurrentWeather {
            condition,
            description,
            temperature: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            sunrise: sys.sunrise.and_then(unix_to_utc),
            place,
        })
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastPoint>, WeatherError> {
        let parsed: OwForecastResponse = self
            .get_json(
                "forecast",
                &self.forecast_url,
                &[
                    ("q", city),
                    ("units", self.units.as_str()),
                    ("appid", self.api_key.as_str()),
                ],
            )
            .await?;

        let points = parsed
            .list
            .into_iter()
            .filter_map(|entry| {
                let time = unix_to_utc(entry.dt)?;
                let condition = entry
                    .weather
                    .first()
                    .map(|w| Condition::from_main(&w.main))
                    .unwrap_or_else(|| Condition::Other("Unknown".to_string()));

                Some(ForecastPoint {
                    time,
                    time_text: entry.dt_txt,
                    temperature: entry.main.temp,
                    condition,
                })
            })
            .collect();

        Ok(daily_points(points))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn fetch_suggestions(&self, query: &str) -> Result<Vec<Suggestion>, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let limit = SUGGESTION_LIMIT.to_string();
        let parsed: Vec<OwGeoEntry> = self
            .get_json(
                "geocoding",
                &self.geocode_url,
                &[("q", query), ("limit", limit.as_str()), ("appid", self.api_key.as_str())],
            )
            .await?;

        Ok(parsed
            .into_iter()
            .take(SUGGESTION_LIMIT)
            .map(|g| Suggestion {
                name: g.name,
                country: g.country.unwrap_or_default(),
                state: g.state,
                lat: g.lat,
                lon: g.lon,
            })
            .collect())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &Url,
        query: &[(&str, &str)],
    ) -> Result<T, WeatherError> {
        let res = self
            .http
            .get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        tracing::debug!(endpoint, %status, bytes = body.len(), "OpenWeather responded");

        check_status(endpoint, status, &body)?;

        serde_json::from_str(&body).map_err(|source| WeatherError::Parse { endpoint, source })
    }
}

/// OpenWeather embeds its own status in the body as `cod`, a number on some
/// endpoints and a string on others.
fn check_status(
    endpoint: &'static str,
    status: StatusCode,
    body: &str,
) -> Result<(), WeatherError> {
    let envelope = serde_json::from_str::<OwEnvelope>(body).ok();
    let code = envelope
        .as_ref()
        .and_then(|e| e.cod.as_ref())
        .map(OwCode::to_string);

    let message = || {
        envelope
            .as_ref()
            .and_then(|e| e.message.as_ref())
            .map(|m| match m {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| truncate_body(body))
    };

    match code {
        Some(code) if code != "200" => Err(WeatherError::Provider {
            endpoint,
            code,
            message: message(),
        }),
        _ if !status.is_success() => Err(WeatherError::Provider {
            endpoint,
            code: status.as_u16().to_string(),
            message: message(),
        }),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
struct OwEnvelope {
    cod: Option<OwCode>,
    message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl fmt::Display for OwCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwCode::Number(n) => write!(f, "{n}"),
            OwCode::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    weather: Vec<OwWeather>,
    main: OwMain,
    wind: OwWind,
    sys: Option<OwSys>,
}

#[derive(Debug, Deserialize)]
struct OwForecastTemp {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastTemp,
    weather: Vec<OwWeather>,
    dt_txt: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        self.fetch_current(city).await
    }

    async fn daily_forecast(&self, city: &str) -> Result<Vec<ForecastPoint>, WeatherError> {
        self.fetch_forecast(city).await
    }

    async fn city_suggestions(&self, query: &str) -> Result<Vec<Suggestion>, WeatherError> {
        self.fetch_suggestions(query).await
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
