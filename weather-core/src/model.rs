use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::period::DayPeriod;

/// A tracked city as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
}

/// Current conditions for one city, as returned by a provider.
///
/// All timestamps are epoch seconds exactly as the provider reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    pub temperature: f64,
    pub condition: String,
    pub sunrise: i64,
    pub sunset: i64,
    pub observed_at: i64,
}

impl WeatherInfo {
    pub fn observed_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.observed_at, 0)
    }

    pub fn sunrise_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sunrise, 0)
    }

    pub fn sunset_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sunset, 0)
    }
}

/// What the dashboard shows for a city on a single render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city_id: i64,
    pub temperature: f64,
    pub condition: String,
    pub day_period: DayPeriod,
}

impl WeatherSnapshot {
    pub fn from_info(city: &City, info: &WeatherInfo) -> Self {
        Self {
            city_id: city.id,
            temperature: info.temperature,
            condition: info.condition.clone(),
            day_period: DayPeriod::classify(info.sunrise, info.sunset, info.observed_at),
        }
    }
}

/// Result of rendering the dashboard. Built fresh per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    /// Snapshots keyed by city name.
    pub weather: BTreeMap<String, WeatherSnapshot>,
    /// Cities the provider could not resolve; offered for removal.
    pub stale: Vec<City>,
    pub warnings: Vec<String>,
}
