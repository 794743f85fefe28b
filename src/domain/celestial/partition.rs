//! Day/night partitioning of the local 24-hour clock.

#![allow(clippy::cast_precision_loss)]

use crate::domain::weather::WeatherSnapshot;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const SECONDS_PER_HOUR: f64 = 3_600.0;
pub const DEFAULT_SUNRISE_HOUR: f64 = 6.0;
pub const DEFAULT_SUNSET_HOUR: f64 = 18.0;
/// Night window used when the provider gives no sunrise/sunset.
pub const FIXED_NIGHT_START_HOUR: f64 = 20.0;
pub const FIXED_NIGHT_END_HOUR: f64 = 6.0;

/// Wraps any hour value into `[0, 24)`.
#[must_use]
pub fn normalize_hour(hour: f64) -> f64 {
    ((hour % 24.0) + 24.0) % 24.0
}

/// Local seconds (UTC + offset) to an hour-of-day in `[0, 24)`.
#[must_use]
pub fn seconds_to_local_hour(local_seconds: f64) -> f64 {
    (((local_seconds % SECONDS_PER_DAY) + SECONDS_PER_DAY) % SECONDS_PER_DAY) / SECONDS_PER_HOUR
}

/// Hours from `start` forward to `end` on a 24-hour clock; never zero.
#[must_use]
pub fn modular_difference(end: f64, start: f64) -> f64 {
    let diff = (end - start + 24.0) % 24.0;
    if diff <= 0.0 { 24.0 } else { diff }
}

/// Sunrise and sunset of the current location, in local hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunWindow {
    pub sunrise_hour: f64,
    pub sunset_hour: f64,
    /// Both events were reported by the provider.
    pub known: bool,
}

impl SunWindow {
    #[must_use]
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        let offset = snapshot.timezone_offset_seconds;
        let to_local = |utc: Option<f64>| utc.map(|seconds| seconds_to_local_hour(seconds + offset));
        Self {
            sunrise_hour: to_local(snapshot.sunrise_utc_seconds).unwrap_or(DEFAULT_SUNRISE_HOUR),
            sunset_hour: to_local(snapshot.sunset_utc_seconds).unwrap_or(DEFAULT_SUNSET_HOUR),
            known: snapshot.has_sun_window(),
        }
    }

    #[must_use]
    pub fn new(sunrise_hour: f64, sunset_hour: f64) -> Self {
        Self {
            sunrise_hour,
            sunset_hour,
            known: true,
        }
    }

    #[must_use]
    pub fn day_span(&self) -> f64 {
        modular_difference(self.sunset_hour, self.sunrise_hour)
    }

    #[must_use]
    pub fn night_span(&self) -> f64 {
        24.0 - self.day_span()
    }

    /// Whether `local_hour` lies outside `[sunrise, sunset)`, honouring a
    /// window that wraps past midnight.
    #[must_use]
    pub fn is_night(&self, local_hour: f64) -> bool {
        if !self.known {
            return local_hour < FIXED_NIGHT_END_HOUR || local_hour >= FIXED_NIGHT_START_HOUR;
        }
        if self.sunrise_hour < self.sunset_hour {
            local_hour < self.sunrise_hour || local_hour >= self.sunset_hour
        } else {
            !(local_hour >= self.sunrise_hour || local_hour < self.sunset_hour)
        }
    }

    /// Hours elapsed since sunset divided by the night span, wrapping past
    /// midnight.
    fn elapsed_night_fraction(&self, local_hour: f64) -> f64 {
        let night_span = self.night_span();
        if local_hour >= self.sunset_hour {
            (local_hour - self.sunset_hour) / night_span
        } else {
            (local_hour + (24.0 - self.sunset_hour)) / night_span
        }
    }

    /// Position within the current day (or night) span, clamped to `[0, 1]`.
    #[must_use]
    pub fn daylight_progress(&self, local_hour: f64, is_night: bool) -> f64 {
        let progress = if !is_night && self.known && self.day_span() > 0.0 {
            (local_hour - self.sunrise_hour) / self.day_span()
        } else if is_night && self.known && self.night_span() > 0.0 {
            self.elapsed_night_fraction(local_hour)
        } else {
            local_hour / 24.0
        };
        progress.clamp(0.0, 1.0)
    }

    /// Position within the post-sunset/pre-sunrise span, reduced to `[0, 1)`.
    /// Outside that span, or without provider data, falls back to the
    /// fraction of the day elapsed.
    #[must_use]
    pub fn night_progress(&self, local_hour: f64) -> f64 {
        let in_night_span = local_hour >= self.sunset_hour || local_hour < self.sunrise_hour;
        let progress = if self.known && self.night_span() > 0.0 && in_night_span {
            self.elapsed_night_fraction(local_hour)
        } else {
            local_hour / 24.0
        };
        ((progress % 1.0) + 1.0) % 1.0
    }
}
