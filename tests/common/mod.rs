#![allow(clippy::cast_precision_loss)]
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use globe_sky::domain::weather::WeatherSnapshot;
use serde_json::{Value, json};

/// 2024-06-01 03:00:00 UTC, which is midday in Tokyo.
pub const TOKYO_NOON_MILLIS: i64 = 1_717_210_800_000;
pub const TOKYO_OFFSET: f64 = 9.0 * 3600.0;

pub fn tokyo_noon() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(TOKYO_NOON_MILLIS)
        .single()
        .expect("valid timestamp")
}

/// Tokyo with sunrise 05:00 and sunset 19:00 local time.
pub fn tokyo_snapshot(cloud_cover: f64) -> WeatherSnapshot {
    let local_midnight_utc = TOKYO_NOON_MILLIS / 1000 - 12 * 3600;
    WeatherSnapshot {
        timezone_offset_seconds: TOKYO_OFFSET,
        sunrise_utc_seconds: Some((local_midnight_utc + 5 * 3600) as f64),
        sunset_utc_seconds: Some((local_midnight_utc + 19 * 3600) as f64),
        cloud_coverage_percent: Some(cloud_cover),
    }
}

/// An OpenWeather current-weather body for Tokyo at local noon.
pub fn tokyo_payload(condition: &str, clouds: f64) -> Value {
    let snapshot = tokyo_snapshot(clouds);
    json!({
        "name": "Tokyo",
        "dt": TOKYO_NOON_MILLIS / 1000,
        "timezone": snapshot.timezone_offset_seconds,
        "weather": [{ "main": condition, "description": condition.to_lowercase() }],
        "clouds": { "all": clouds },
        "sys": {
            "sunrise": snapshot.sunrise_utc_seconds,
            "sunset": snapshot.sunset_utc_seconds,
        },
    })
}
