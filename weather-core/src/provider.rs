use crate::{Config, model::WeatherInfo, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Why a single fetch failed. Callers decide how to surface it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("city '{0}' is not known to the weather provider")]
    UnknownCity(String),

    #[error("weather provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to reach weather provider: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse weather provider response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of current weather conditions, looked up by city name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// One request, no retries.
    async fn fetch(&self, city: &str) -> Result<WeatherInfo, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weather configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = OpenWeatherProvider::with_options(
        api_key.to_owned(),
        config.openweather_url(),
        config.request_timeout(),
    )?;

    Ok(Box::new(provider))
}
