use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::condition::Condition;

/// City shown when nothing has been saved yet.
pub const DEFAULT_CITY: &str = "London";

/// Time-of-day marker that picks one forecast point per day.
pub const DAILY_REFERENCE_TIME: &str = "12:00:00";

/// Unit system sent to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }

    /// Label for the wind speed the provider returns in this system.
    pub fn wind_speed_label(&self) -> &'static str {
        match self {
            Units::Metric | Units::Standard => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            _ => Err(anyhow!(
                "Unknown units '{value}'. Supported units: metric, imperial, standard."
            )),
        }
    }
}

/// Where a snapshot was observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub country: String,
}

impl std::fmt::Display for Place {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.name, self.country)
    }
}

/// Current conditions for the selected city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub condition: Condition,
    pub description: String,
    pub temperature: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub sunrise: Option<DateTime<Utc>>,
    pub place: Option<Place>,
}

/// One provider reading in the future.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub time: DateTime<Utc>,
    /// Provider-formatted timestamp, e.g. `2024-05-01 12:00:00`.
    pub time_text: String,
    pub temperature: f64,
    pub condition: Condition,
}

impl ForecastPoint {
    pub fn is_daily_reference(&self) -> bool {
        self.time_text.contains(DAILY_REFERENCE_TIME)
    }
}

/// Keep only the points taken at the daily reference time, in provider order.
pub fn daily_points(points: Vec<ForecastPoint>) -> Vec<ForecastPoint> {
    points
        .into_iter()
        .filter(ForecastPoint::is_daily_reference)
        .collect()
}

/// Geocoding candidate offered while searching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.state {
            Some(state) => write!(f, "{}, {}, {}", self.name, state, self.country),
            None => write!(f, "{}, {}", self.name, self.country),
        }
    }
}
