//! Coarse time-of-day classification relative to sunrise and sunset.

use serde::{Deserialize, Serialize};

/// Seconds after sunrise (and before sunset) before it counts as full day.
const DAY_MARGIN_SECS: i64 = 3600;
/// Seconds after sunset (and before sunrise) before it counts as night.
const NIGHT_MARGIN_SECS: i64 = 1800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayPeriod {
    Day,
    Night,
    EveningMorning,
}

impl DayPeriod {
    /// Classify `now` against the provider's sunrise/sunset for the same place.
    ///
    /// Rules are checked in order and the first match wins. The bands
    /// between 1800s and 3600s around sunrise and sunset fall through to
    /// `EveningMorning`. Margins saturate, so extreme provider timestamps
    /// cannot overflow.
    pub fn classify(sunrise: i64, sunset: i64, now: i64) -> Self {
        let day_start = sunrise.saturating_add(DAY_MARGIN_SECS);
        let day_end = sunset.saturating_sub(DAY_MARGIN_SECS);
        let night_start = sunset.saturating_add(NIGHT_MARGIN_SECS);
        let night_end = sunrise.saturating_sub(NIGHT_MARGIN_SECS);

        if day_start < now && now < day_end {
            DayPeriod::Day
        } else if now > night_start || now < night_end {
            DayPeriod::Night
        } else {
            DayPeriod::EveningMorning
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayPeriod::Day => "day",
            DayPeriod::Night => "night",
            DayPeriod::EveningMorning => "evening-morning",
        }
    }
}

impl std::fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shorthand for [`DayPeriod::classify`].
pub fn classify(sunrise: i64, sunset: i64, now: i64) -> DayPeriod {
    DayPeriod::classify(sunrise, sunset, now)
}
