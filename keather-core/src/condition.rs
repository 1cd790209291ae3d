use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-color background gradient, top to bottom.
pub type Gradient = [&'static str; 2];

/// Icon shown when a condition has no entry of its own.
pub const DEFAULT_ICON: &str = "weather-cloudy";

/// Gradient used for conditions without a dedicated palette.
pub const DEFAULT_GRADIENT: Gradient = ["#152B54", "#1E4274"];

/// Gradient behind the loading and error messages.
pub const STATUS_GRADIENT: Gradient = ["#1E3C72", "#2A5298"];

const KNOWN: &[Condition] = &[
    Condition::Clear,
    Condition::Clouds,
    Condition::Rain,
    Condition::Snow,
    Condition::Drizzle,
    Condition::Thunderstorm,
    Condition::Mist,
    Condition::Smoke,
    Condition::Haze,
    Condition::Dust,
    Condition::Fog,
    Condition::Sand,
    Condition::Ash,
    Condition::Squall,
    Condition::Tornado,
];

/// Provider condition category (`weather[0].main` in OpenWeather payloads).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Drizzle,
    Thunderstorm,
    Mist,
    Smoke,
    Haze,
    Dust,
    Fog,
    Sand,
    Ash,
    Squall,
    Tornado,
    /// Anything the provider sends that is not listed above.
    Other(String),
}

impl Condition {
    /// Every category with a dedicated table entry.
    pub fn known() -> &'static [Condition] {
        KNOWN
    }

    /// Parse the provider's category string. Matching is exact, like the
    /// provider's own capitalisation.
    pub fn from_main(main: &str) -> Self {
        match main {
            "Clear" => Condition::Clear,
            "Clouds" => Condition::Clouds,
            "Rain" => Condition::Rain,
            "Snow" => Condition::Snow,
            "Drizzle" => Condition::Drizzle,
            "Thunderstorm" => Condition::Thunderstorm,
            "Mist" => Condition::Mist,
            "Smoke" => Condition::Smoke,
            "Haze" => Condition::Haze,
            "Dust" => Condition::Dust,
            "Fog" => Condition::Fog,
            "Sand" => Condition::Sand,
            "Ash" => Condition::Ash,
            "Squall" => Condition::Squall,
            "Tornado" => Condition::Tornado,
            other => Condition::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Clouds",
            Condition::Rain => "Rain",
            Condition::Snow => "Snow",
            Condition::Drizzle => "Drizzle",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Mist => "Mist",
            Condition::Smoke => "Smoke",
            Condition::Haze => "Haze",
            Condition::Dust => "Dust",
            Condition::Fog => "Fog",
            Condition::Sand => "Sand",
            Condition::Ash => "Ash",
            Condition::Squall => "Squall",
            Condition::Tornado => "Tornado",
            Condition::Other(raw) => raw,
        }
    }

    /// Material Community icon identifier for this condition.
    pub fn icon(&self) -> &'static str {
        match self {
            Condition::Clear => "weather-sunny",
            Condition::Clouds => "weather-cloudy",
            Condition::Rain => "weather-rainy",
            Condition::Snow => "weather-snowy",
            Condition::Drizzle => "weather-partly-rainy",
            Condition::Thunderstorm => "weather-lightning",
            Condition::Mist | Condition::Smoke | Condition::Fog => "weather-fog",
            Condition::Haze | Condition::Dust | Condition::Sand | Condition::Ash => "weather-hazy",
            Condition::Squall => "weather-windy",
            Condition::Tornado => "weather-tornado",
            Condition::Other(_) => DEFAULT_ICON,
        }
    }

    /// Background gradient for this condition.
    pub fn gradient(&self) -> Gradient {
        match self {
            Condition::Clear => ["#FF6700", "#FFA726"],
            Condition::Clouds => ["#5D6478", "#B4B9CC"],
            Condition::Rain => ["#2C3138", "#316CF7"],
            Condition::Snow => ["#688BB8", "#A7E5FF"],
            Condition::Thunderstorm => ["#0F1824", "#1D2E46"],
            Condition::Drizzle => ["#2E6CB0", "#324B5A"],
            Condition::Fog | Condition::Mist => ["#4D5666", "#323A46"],
            _ => DEFAULT_GRADIENT,
        }
    }
}

impl From<String> for Condition {
    fn from(value: String) -> Self {
        Condition::from_main(&value)
    }
}

impl From<Condition> for String {
    fn from(value: Condition) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
