//! Core library for the `keather` weather screen.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider behind the `WeatherProvider` abstraction
//! - Condition lookup tables (icons, gradients)
//! - Persistence of the last selected city
//! - The screen: an immutable view state, its reducer, and the effect driver
//!
//! It is used by `keather-cli`, but can also be reused by other front ends.

pub mod condition;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod screen;
pub mod store;

pub use condition::{Condition, Gradient};
pub use config::Config;
pub use error::WeatherError;
pub use model::{CurrentWeather, ForecastPoint, Place, Suggestion, Units};
pub use provider::{WeatherProvider, provider_from_config};
pub use screen::{Phase, Screen, ViewState};
pub use store::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
