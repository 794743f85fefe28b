use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_CLOUD_COVER_PERCENT: f64 = 35.0;

/// The slice of a current-weather response the sky model reads.
///
/// Every numeric field stays `f64` so a malformed upstream value arrives as
/// NaN and trips the celestial fallback instead of vanishing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub timezone_offset_seconds: f64,
    pub sunrise_utc_seconds: Option<f64>,
    pub sunset_utc_seconds: Option<f64>,
    pub cloud_coverage_percent: Option<f64>,
}

impl WeatherSnapshot {
    /// Reads `timezone`, `sys.sunrise`, `sys.sunset` and `clouds.all` from an
    /// OpenWeather style body. Missing or `null` fields become `None` (a zero
    /// offset for `timezone`), fields of the wrong type become NaN.
    #[must_use]
    pub fn from_api_value(body: &Value) -> Self {
        Self {
            timezone_offset_seconds: timezone_field(body.get("timezone")),
            sunrise_utc_seconds: numeric_field(body.pointer("/sys/sunrise")),
            sunset_utc_seconds: numeric_field(body.pointer("/sys/sunset")),
            cloud_coverage_percent: numeric_field(body.pointer("/clouds/all")),
        }
    }

    #[must_use]
    pub fn cloud_cover(&self) -> f64 {
        self.cloud_coverage_percent
            .unwrap_or(DEFAULT_CLOUD_COVER_PERCENT)
    }

    #[must_use]
    pub fn has_sun_window(&self) -> bool {
        self.sunrise_utc_seconds.is_some() && self.sunset_utc_seconds.is_some()
    }
}

fn numeric_field(value: Option<&Value>) -> Option<f64> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(number)) => Some(number.as_f64().unwrap_or(f64::NAN)),
        Some(other) => {
            log::warn!("ignoring malformed numeric weather field: {other}");
            Some(f64::NAN)
        }
    }
}

fn timezone_field(value: Option<&Value>) -> f64 {
    numeric_field(value).unwrap_or(0.0)
}

/// A fetched current-weather observation for one place.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location_name: String,
    pub condition: Option<String>,
    pub observed_at: Option<i64>,
    pub snapshot: WeatherSnapshot,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherReport {
    #[must_use]
    pub fn from_api_value(body: &Value, fallback_name: &str, fetched_at: DateTime<Utc>) -> Self {
        let location_name = body
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or(fallback_name)
            .to_string();
        let condition = body
            .pointer("/weather/0/main")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            location_name,
            condition,
            observed_at: body.get("dt").and_then(Value::as_i64),
            snapshot: WeatherSnapshot::from_api_value(body),
            fetched_at,
        }
    }

    #[must_use]
    pub fn category(&self) -> WeatherCategory {
        self.condition
            .as_deref()
            .map_or(WeatherCategory::Unknown, condition_to_category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCategory {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Fog,
    Thunder,
    Unknown,
}

/// Maps an OpenWeather `weather[0].main` group to a category.
#[must_use]
pub fn condition_to_category(main: &str) -> WeatherCategory {
    let main = main.trim().to_lowercase();
    if main.contains("storm") {
        WeatherCategory::Thunder
    } else if main.contains("rain") {
        WeatherCategory::Rain
    } else if main.contains("snow") {
        WeatherCategory::Snow
    } else if main.contains("cloud") {
        WeatherCategory::Cloudy
    } else if main.contains("mist") || main.contains("fog") {
        WeatherCategory::Fog
    } else if main.contains("clear") {
        WeatherCategory::Clear
    } else {
        WeatherCategory::Unknown
    }
}

/// How much the condition dims scene lighting.
#[must_use]
pub fn light_factor(category: WeatherCategory) -> f64 {
    match category {
        WeatherCategory::Thunder => 0.35,
        WeatherCategory::Rain => 0.45,
        WeatherCategory::Snow => 0.55,
        WeatherCategory::Cloudy => 0.65,
        WeatherCategory::Fog => 0.5,
        WeatherCategory::Clear | WeatherCategory::Unknown => 1.0,
    }
}
