//! Core library for the `weather` terminal app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weatherstack provider client and its typed payloads
//! - Input validation and per-view request state
//! - The location search state and the controller tying the views together
//!
//! It is used by `weather-cli`, but holds no rendering code of its own.

pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod search;
pub mod state;
pub mod validate;
pub mod view;

#[cfg(test)]
mod testing;

pub use app::WeatherApp;
pub use config::Config;
pub use error::{ProviderError, ValidationError};
pub use model::{
    Coordinates, HistoricalReport, IconKey, LocationQuery, MarineReport, Metric, WeatherSnapshot,
};
pub use provider::{WeatherProvider, WeatherstackProvider, provider_from_config};
pub use state::{DisplayMode, RequestState, ViewMachine};
pub use view::{CurrentWeather, HistoricalWeather, MarineWeather, View, WeatherKind};
