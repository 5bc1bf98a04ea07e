use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::{config::DEFAULT_OPENWEATHER_URL, model::WeatherInfo};

use super::{FetchError, WeatherProvider};

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self, FetchError> {
        Self::with_options(api_key, DEFAULT_OPENWEATHER_URL, DEFAULT_TIMEOUT)
    }

    /// `base_url` is the scheme and host, without the `/data/2.5` path.
    pub fn with_options(
        api_key: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { api_key, base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherInfo, FetchError> {
        let url = format!("{}{}", self.base_url, CURRENT_WEATHER_PATH);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::UnknownCity(city.to_string()));
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;

        let condition = parsed
            .weather
            .first()
            .map(|w| w.main.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(WeatherInfo {
            temperature: parsed.main.temp,
            condition,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
            observed_at: parsed.dt,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: i64,
    main: OwMain,
    sys: OwSys,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, city: &str) -> Result<WeatherInfo, FetchError> {
        tracing::debug!(city, "fetching current weather from OpenWeather");
        self.fetch_current(city).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
