use crate::{
    Config,
    error::WeatherError,
    model::{CurrentWeather, ForecastPoint, Suggestion},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Maximum number of geocoding candidates requested per query.
pub const SUGGESTION_LIMIT: usize = 5;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a city name.
    async fn current_weather(&self, city: &str) -> Result<CurrentWeather, WeatherError>;

    /// One forecast point per upcoming day, in provider order.
    async fn daily_forecast(&self, city: &str) -> Result<Vec<ForecastPoint>, WeatherError>;

    /// Up to [`SUGGESTION_LIMIT`] cities matching a partial name. Blank
    /// queries yield an empty list without touching the network.
    async fn city_suggestions(&self, query: &str) -> Result<Vec<Suggestion>, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider = OpenWeatherProvider::builder(api_key.to_owned())
        .units(config.units)
        .base_url(&config.base_url)
        .timeout_secs(config.request_timeout_secs)
        .build()?;

    Ok(Box::new(provider))
}
