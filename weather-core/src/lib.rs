//! Core library for the city weather tracker.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The persisted city list
//! - Abstraction over the weather provider (OpenWeather)
//! - Day-period classification
//! - Page-level render/add/delete operations
//!
//! It is used by `weather-web`, but has no dependency on any HTTP server.

pub mod config;
pub mod model;
pub mod period;
pub mod provider;
pub mod store;
pub mod view;

pub use config::Config;
pub use model::{City, Dashboard, WeatherInfo, WeatherSnapshot};
pub use period::{DayPeriod, classify};
pub use provider::{FetchError, WeatherProvider, openweather::OpenWeatherProvider};
pub use store::{CityStore, SqliteCityStore, StoreError};
pub use view::AddCity;
