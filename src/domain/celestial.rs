//! Sun, moon and sky parameters for the snow-globe scene.
//!
//! [`CelestialModel::compute`] turns the current time, an optional manual hour
//! and an optional [`WeatherSnapshot`] into a fully populated
//! [`CelestialState`]. The computation is pure apart from the injected
//! [`Clock`], which is only consulted for the device-local hour.

#![allow(clippy::cast_precision_loss)]

pub mod palette;
pub mod partition;

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use chrono::{Local, Timelike, Utc};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use self::palette::{PaletteInputs, derive_palette};
use self::partition::{SECONDS_PER_DAY, SunWindow, normalize_hour, seconds_to_local_hour};
use crate::domain::color::Rgb;
use crate::domain::weather::WeatherSnapshot;

pub use self::palette::{SkyTuning, StarTuning};

/// Radius of the implicit sky sphere the bodies travel on.
pub const SKY_RADIUS: f64 = 95.0;
/// Peak sun height as a fraction of [`SKY_RADIUS`].
pub const SUN_ELEVATION_SCALE: f64 = 0.6;
/// Sun height scale of the stylised no-weather cycle.
pub const FALLBACK_ELEVATION_SCALE: f64 = 0.45;
/// Highest the sun may sit while night is active.
pub const NIGHT_SUN_CEILING: f64 = -10.0;
pub const NIGHT_SUN_FLIP: f64 = -0.35;
pub const MOON_ORBIT_SCALE: f64 = 0.75;
pub const MOON_ELEVATION_SCALE: f64 = 0.45;
pub const MOON_ELEVATION_LIFT: f64 = 12.0;

const FALLBACK_NIGHT_BACKGROUND: Rgb = Rgb::from_u32(0x060b18);
const FALLBACK_MOON_SCALE: f64 = 0.8;
const FALLBACK_MOON_LIFT: f64 = 10.0;

/// Source of wall-clock time.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
    /// Hour of day on the device, `0..24`.
    fn local_hour(&self) -> u32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn local_hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    pub now_millis: i64,
    pub local_hour: u32,
}

impl FixedClock {
    #[must_use]
    pub fn new(now_millis: i64, local_hour: u32) -> Self {
        Self {
            now_millis,
            local_hour,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now_millis
    }

    fn local_hour(&self) -> u32 {
        self.local_hour
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CelestialError {
    #[error("manual hour override {0} is not a finite number")]
    NonFiniteOverride(f64),
    #[error("weather field `{0}` is not a finite number")]
    NonFiniteInput(&'static str),
    #[error("derived value `{0}` is not a finite number")]
    NonFiniteOutput(&'static str),
}

/// Render parameters for one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelestialState {
    pub sun_position: DVec3,
    pub moon_position: DVec3,
    pub is_night: bool,
    pub background_color: Rgb,
    pub sky_tuning: SkyTuning,
    pub sun_intensity: f64,
    pub ambient_intensity: f64,
    pub moonlight_intensity: f64,
    pub show_stars: bool,
    pub star_tuning: StarTuning,
    pub sun_color: Rgb,
    pub aura_color: Rgb,
    pub ambient_sky_color: Rgb,
    pub ground_color: Rgb,
    pub moon_color: Rgb,
    pub sun_aura_intensity: f64,
    pub moon_aura_intensity: f64,
    pub local_hour: f64,
}

impl CelestialState {
    /// The fixed daytime state returned whenever computation fails.
    #[must_use]
    pub fn fallback(local_hour: f64) -> Self {
        Self {
            sun_position: DVec3::new(55.0, 40.0, -28.0),
            moon_position: DVec3::new(-42.0, 24.0, 42.0),
            is_night: false,
            background_color: Rgb::from_u32(0x87ceeb),
            sky_tuning: SkyTuning {
                turbidity: 6.0,
                rayleigh: 2.0,
                mie_coefficient: 0.005,
                mie_directional_g: 0.8,
                exposure: 0.5,
            },
            sun_intensity: 1.1,
            ambient_intensity: 0.55,
            moonlight_intensity: 0.1,
            show_stars: false,
            star_tuning: StarTuning {
                radius: 250.0,
                depth: 60.0,
                count: 2500,
                factor: 4.0,
                saturation: 0.0,
                fade: true,
                speed: 0.6,
            },
            sun_color: Rgb::from_u32(0xffd27d),
            aura_color: Rgb::from_u32(0xffb347),
            ambient_sky_color: Rgb::from_u32(0x9ec7ff),
            ground_color: Rgb::from_u32(0x3b4f3d),
            moon_color: Rgb::from_u32(0xf2f6ff),
            sun_aura_intensity: 0.65,
            moon_aura_intensity: 0.2,
            local_hour,
        }
    }

    fn ensure_finite(&self) -> Result<(), CelestialError> {
        let scalars = [
            ("sunPosition", self.sun_position.is_finite()),
            ("moonPosition", self.moon_position.is_finite()),
            ("localHour", self.local_hour.is_finite()),
            ("sunIntensity", self.sun_intensity.is_finite()),
            ("ambientIntensity", self.ambient_intensity.is_finite()),
            ("moonlightIntensity", self.moonlight_intensity.is_finite()),
            ("sunAuraIntensity", self.sun_aura_intensity.is_finite()),
            ("moonAuraIntensity", self.moon_aura_intensity.is_finite()),
            ("skyTuning.turbidity", self.sky_tuning.turbidity.is_finite()),
            ("skyTuning.rayleigh", self.sky_tuning.rayleigh.is_finite()),
            (
                "skyTuning.mieCoefficient",
                self.sky_tuning.mie_coefficient.is_finite(),
            ),
            ("skyTuning.exposure", self.sky_tuning.exposure.is_finite()),
            ("starTuning.factor", self.star_tuning.factor.is_finite()),
            ("starTuning.speed", self.star_tuning.speed.is_finite()),
        ];
        match scalars.into_iter().find(|(_, finite)| !finite) {
            Some((name, _)) => Err(CelestialError::NonFiniteOutput(name)),
            None => Ok(()),
        }
    }
}

/// Derives [`CelestialState`]s; see the module docs.
#[derive(Debug, Clone, Default)]
pub struct CelestialModel<C = SystemClock> {
    clock: C,
}

impl CelestialModel<SystemClock> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> CelestialModel<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Computes the state at `now_millis`. Never fails: any invalid input or
    /// non-finite intermediate yields [`CelestialState::fallback`].
    pub fn compute(
        &self,
        weather: Option<&WeatherSnapshot>,
        now_millis: i64,
        manual_hour: Option<f64>,
    ) -> CelestialState {
        match self.try_compute(weather, now_millis, manual_hour) {
            Ok(state) => state,
            Err(err) => {
                log::debug!("celestial computation fell back to defaults: {err}");
                CelestialState::fallback(self.fallback_hour(manual_hour))
            }
        }
    }

    /// [`Self::compute`] at the clock's current time.
    pub fn compute_now(
        &self,
        weather: Option<&WeatherSnapshot>,
        manual_hour: Option<f64>,
    ) -> CelestialState {
        self.compute(weather, self.clock.now_millis(), manual_hour)
    }

    /// The fallible body of [`Self::compute`].
    pub fn try_compute(
        &self,
        weather: Option<&WeatherSnapshot>,
        now_millis: i64,
        manual_hour: Option<f64>,
    ) -> Result<CelestialState, CelestialError> {
        let override_hour = match manual_hour {
            Some(hour) if !hour.is_finite() => return Err(CelestialError::NonFiniteOverride(hour)),
            Some(hour) => Some(normalize_hour(hour)),
            None => None,
        };
        let utc_seconds = now_millis.div_euclid(1000);

        let state = match weather {
            None => {
                let local_hour = override_hour.unwrap_or_else(|| self.device_hour());
                fallback_cycle(utc_seconds, override_hour, local_hour)
            }
            Some(snapshot) => {
                validate_snapshot(snapshot)?;
                weather_cycle(snapshot, utc_seconds, override_hour)
            }
        };
        state.ensure_finite()?;
        Ok(state)
    }

    fn device_hour(&self) -> f64 {
        f64::from(self.clock.local_hour() % 24)
    }

    fn fallback_hour(&self, manual_hour: Option<f64>) -> f64 {
        manual_hour
            .map(normalize_hour)
            .filter(|hour| hour.is_finite())
            .unwrap_or_else(|| self.device_hour())
    }
}

fn validate_snapshot(snapshot: &WeatherSnapshot) -> Result<(), CelestialError> {
    let fields = [
        ("timezone", Some(snapshot.timezone_offset_seconds)),
        ("sys.sunrise", snapshot.sunrise_utc_seconds),
        ("sys.sunset", snapshot.sunset_utc_seconds),
        ("clouds.all", snapshot.cloud_coverage_percent),
    ];
    for (name, value) in fields {
        if value.is_some_and(|v| !v.is_finite()) {
            return Err(CelestialError::NonFiniteInput(name));
        }
    }
    Ok(())
}

/// Stylised 24-hour loop used when no weather data is available. The moon
/// keeps its default position during the day.
fn fallback_cycle(utc_seconds: i64, override_hour: Option<f64>, local_hour: f64) -> CelestialState {
    let cycle_progress = override_hour.map_or_else(
        || utc_seconds.rem_euclid(86_400) as f64 / SECONDS_PER_DAY,
        |hour| hour / 24.0,
    );
    let angle = cycle_progress * TAU;
    let sun_y = angle.sin() * SKY_RADIUS * FALLBACK_ELEVATION_SCALE;
    let sun_position = DVec3::new(angle.cos() * SKY_RADIUS, sun_y, angle.sin() * SKY_RADIUS);

    let mut state = CelestialState {
        sun_position,
        is_night: sun_y < 0.0,
        ..CelestialState::fallback(local_hour)
    };
    if state.is_night {
        state.background_color = FALLBACK_NIGHT_BACKGROUND;
        state.show_stars = true;
        state.star_tuning.count = 3200;
        state.star_tuning.factor = 3.5;
        state.sun_intensity = 0.05;
        state.ambient_intensity = 0.3;
        state.moon_position = DVec3::new(
            -sun_position.x,
            sun_position.y.abs() * FALLBACK_MOON_SCALE + FALLBACK_MOON_LIFT,
            -sun_position.z,
        );
    }
    state
}

fn weather_cycle(
    snapshot: &WeatherSnapshot,
    utc_seconds: i64,
    override_hour: Option<f64>,
) -> CelestialState {
    let local_seconds = utc_seconds as f64 + snapshot.timezone_offset_seconds;
    let local_hour = normalize_hour(
        override_hour.unwrap_or_else(|| seconds_to_local_hour(local_seconds)),
    );

    let window = SunWindow::from_snapshot(snapshot);
    let is_night = window.is_night(local_hour);
    let sun_position = sun_position(window.daylight_progress(local_hour, is_night), is_night);
    let night_progress = window.night_progress(local_hour);
    let moon_position = moon_position(night_progress);

    let palette = derive_palette(PaletteInputs {
        is_night,
        cloud_cover: snapshot.cloud_cover(),
        sun_y: sun_position.y,
        night_progress,
    });

    CelestialState {
        sun_position,
        moon_position,
        is_night,
        background_color: palette.background_color,
        sky_tuning: palette.sky_tuning,
        sun_intensity: palette.sun_intensity,
        ambient_intensity: palette.ambient_intensity,
        moonlight_intensity: palette.moonlight_intensity,
        show_stars: palette.show_stars,
        star_tuning: palette.star_tuning,
        sun_color: palette.sun_color,
        aura_color: palette.aura_color,
        ambient_sky_color: palette.ambient_sky_color,
        ground_color: palette.ground_color,
        moon_color: palette.moon_color,
        sun_aura_intensity: palette.sun_aura_intensity,
        moon_aura_intensity: palette.moon_aura_intensity,
        local_hour,
    }
}

/// Sun on a half-circle arc from east to west as `daylight_progress` goes
/// 0 -> 1; pinned below the horizon at night.
#[must_use]
pub fn sun_position(daylight_progress: f64, is_night: bool) -> DVec3 {
    let sun_angle = daylight_progress * PI;
    let azimuth = -FRAC_PI_2 + daylight_progress * PI;
    let mut sun_y = sun_angle.sin() * SKY_RADIUS * SUN_ELEVATION_SCALE;
    if is_night {
        sun_y = (sun_y * NIGHT_SUN_FLIP).min(NIGHT_SUN_CEILING);
    }
    DVec3::new(azimuth.cos() * SKY_RADIUS, sun_y, azimuth.sin() * SKY_RADIUS)
}

#[must_use]
pub fn moon_position(night_progress: f64) -> DVec3 {
    let azimuth = FRAC_PI_2 + night_progress * PI;
    let elevation =
        (night_progress * PI).sin() * SKY_RADIUS * MOON_ELEVATION_SCALE + MOON_ELEVATION_LIFT;
    let orbit = SKY_RADIUS * MOON_ORBIT_SCALE;
    DVec3::new(azimuth.cos() * orbit, elevation, azimuth.sin() * orbit)
}
