#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use serde::{Deserialize, Serialize};

use super::{SKY_RADIUS, SUN_ELEVATION_SCALE};
use crate::domain::color::Rgb;

const BACKGROUND_NIGHT_OVERCAST: Rgb = Rgb::from_u32(0x0a101f);
const BACKGROUND_NIGHT: Rgb = Rgb::from_u32(0x050b18);
const BACKGROUND_DAY_OVERCAST: Rgb = Rgb::from_u32(0xaeb9c6);
const BACKGROUND_DAY_HIGH_SUN: Rgb = Rgb::from_u32(0x6eb7ff);
const BACKGROUND_DAY: Rgb = Rgb::from_u32(0x89c2ff);

const SUN_RISE: Rgb = Rgb::from_u32(0xff944a);
const SUN_PEAK: Rgb = Rgb::from_u32(0xffe6a3);
const SUN_SET: Rgb = Rgb::from_u32(0xff7a4e);
const SUN_TWILIGHT: Rgb = Rgb::from_u32(0x2f4468);
const SUN_NIGHT: Rgb = Rgb::from_u32(0x1c2944);

const AURA_MORNING: Rgb = Rgb::from_u32(0xffb46b);
const AURA_NOON: Rgb = Rgb::from_u32(0xffe4a6);
const AURA_EVENING: Rgb = Rgb::from_u32(0xff946b);
const AURA_NIGHT: Rgb = Rgb::from_u32(0x4a5a7f);
const AURA_NIGHT_CLEAR: Rgb = Rgb::from_u32(0x3a4a6a);

const AMBIENT_SKY_DAY_LOW: Rgb = Rgb::from_u32(0x7fa7ff);
const AMBIENT_SKY_DAY_HIGH: Rgb = Rgb::from_u32(0xd1e6ff);
const AMBIENT_SKY_NIGHT: Rgb = Rgb::from_u32(0x151d33);
const AMBIENT_SKY_TWILIGHT: Rgb = Rgb::from_u32(0x263653);

const GROUND_DAY_LOW: Rgb = Rgb::from_u32(0x324533);
const GROUND_DAY_HIGH: Rgb = Rgb::from_u32(0x6d8d59);
const GROUND_NIGHT: Rgb = Rgb::from_u32(0x1a2318);
const GROUND_TWILIGHT: Rgb = Rgb::from_u32(0x28321f);

const MOON_HAZY: Rgb = Rgb::from_u32(0xd7e0ff);
const MOON_CLEAR: Rgb = Rgb::from_u32(0xf5f8ff);

/// Cloud cover above which the night background darkens.
const NIGHT_OVERCAST_THRESHOLD: f64 = 60.0;
/// Cloud cover above which the day background turns grey.
const DAY_OVERCAST_THRESHOLD: f64 = 65.0;
const HIGH_SUN_THRESHOLD: f64 = 0.7;
const MIN_STAR_VISIBILITY: f64 = 0.1;

/// Atmospheric scattering knobs handed to the sky shader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkyTuning {
    pub turbidity: f64,
    pub rayleigh: f64,
    pub mie_coefficient: f64,
    pub mie_directional_g: f64,
    pub exposure: f64,
}

impl SkyTuning {
    pub const NIGHT: Self = Self {
        turbidity: 2.0,
        rayleigh: 0.2,
        mie_coefficient: 0.001,
        mie_directional_g: 0.7,
        exposure: 0.22,
    };

    #[must_use]
    pub fn day(overcast_factor: f64, sun_height_ratio: f64) -> Self {
        let cloudiness = 1.0 - overcast_factor;
        Self {
            turbidity: 5.0 + cloudiness * 4.0,
            rayleigh: 2.0 + overcast_factor * 2.0,
            mie_coefficient: 0.005 + cloudiness * 0.003,
            mie_directional_g: 0.8,
            exposure: 0.45 + sun_height_ratio * 0.25,
        }
    }
}

/// Starfield parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarTuning {
    pub radius: f64,
    pub depth: f64,
    pub count: u32,
    pub factor: f64,
    pub saturation: f64,
    pub fade: bool,
    pub speed: f64,
}

impl StarTuning {
    #[must_use]
    pub fn for_visibility(star_visibility: f64) -> Self {
        Self {
            radius: 260.0,
            depth: 70.0,
            count: (1800.0 + star_visibility * 4000.0).round().max(0.0) as u32,
            factor: 2.5 + star_visibility * 3.0,
            saturation: 0.0,
            fade: true,
            speed: 0.5 + star_visibility * 0.5,
        }
    }
}

/// Sky clarity: `1 - cloud fraction`, clamped to `[0, 1]`.
#[must_use]
pub fn overcast_factor(cloud_cover: f64) -> f64 {
    1.0 - (cloud_cover / 100.0).clamp(0.0, 1.0)
}

/// Sun elevation relative to its daytime peak; zero below the horizon.
#[must_use]
pub fn sun_height_ratio(sun_y: f64) -> f64 {
    (sun_y / (SKY_RADIUS * SUN_ELEVATION_SCALE)).max(0.0)
}

#[must_use]
pub fn star_visibility(cloud_cover: f64) -> f64 {
    (1.0 - cloud_cover / 100.0).max(MIN_STAR_VISIBILITY)
}

/// Inputs for [`derive_palette`], already resolved by the position steps.
#[derive(Debug, Clone, Copy)]
pub struct PaletteInputs {
    pub is_night: bool,
    pub cloud_cover: f64,
    pub sun_y: f64,
    pub night_progress: f64,
}

/// Everything the renderer needs besides the body positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
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
}

#[must_use]
pub fn derive_palette(inputs: PaletteInputs) -> Palette {
    let PaletteInputs {
        is_night,
        cloud_cover,
        sun_y,
        night_progress,
    } = inputs;
    let overcast = overcast_factor(cloud_cover);
    let height_ratio = sun_height_ratio(sun_y);
    let height = height_ratio.clamp(0.0, 1.0);
    let visibility = star_visibility(cloud_cover);

    let background_color = if is_night {
        if cloud_cover > NIGHT_OVERCAST_THRESHOLD {
            BACKGROUND_NIGHT_OVERCAST
        } else {
            BACKGROUND_NIGHT
        }
    } else if cloud_cover > DAY_OVERCAST_THRESHOLD {
        BACKGROUND_DAY_OVERCAST
    } else if height_ratio > HIGH_SUN_THRESHOLD {
        BACKGROUND_DAY_HIGH_SUN
    } else {
        BACKGROUND_DAY
    };

    if is_night {
        Palette {
            background_color,
            sky_tuning: SkyTuning::NIGHT,
            sun_intensity: 0.04,
            ambient_intensity: 0.28 + overcast * 0.2,
            moonlight_intensity: 0.1 + overcast * 0.18,
            show_stars: true,
            star_tuning: StarTuning::for_visibility(visibility),
            sun_color: SUN_TWILIGHT.mix(SUN_NIGHT, night_progress),
            aura_color: AURA_NIGHT.mix(AURA_NIGHT_CLEAR, visibility),
            ambient_sky_color: AMBIENT_SKY_NIGHT
                .mix(AMBIENT_SKY_TWILIGHT, (visibility + 0.2).min(1.0)),
            ground_color: GROUND_NIGHT.mix(GROUND_TWILIGHT, visibility.max(0.2)),
            moon_color: MOON_HAZY.mix(MOON_CLEAR, visibility),
            sun_aura_intensity: 0.08,
            moon_aura_intensity: 0.25 + visibility * 0.35,
        }
    } else {
        Palette {
            background_color,
            sky_tuning: SkyTuning::day(overcast, height_ratio),
            sun_intensity: 0.75 + overcast * 1.2,
            ambient_intensity: 0.4 + overcast * 0.4,
            moonlight_intensity: 0.0,
            show_stars: false,
            star_tuning: StarTuning::for_visibility(visibility),
            sun_color: rising_or_setting(height, SUN_RISE, SUN_PEAK, SUN_SET),
            aura_color: rising_or_setting(height, AURA_MORNING, AURA_NOON, AURA_EVENING),
            ambient_sky_color: AMBIENT_SKY_DAY_LOW.mix(AMBIENT_SKY_DAY_HIGH, height),
            ground_color: GROUND_DAY_LOW.mix(GROUND_DAY_HIGH, height),
            moon_color: MOON_HAZY.mix(MOON_CLEAR, visibility),
            sun_aura_intensity: 0.45 + height * 0.7,
            moon_aura_intensity: 0.05,
        }
    }
}

/// Three-stop day gradient: `low -> mid` over the lower half of the sun
/// height, `mid -> high` over the upper half.
fn rising_or_setting(height: f64, low: Rgb, mid: Rgb, high: Rgb) -> Rgb {
    if height < 0.5 {
        low.mix(mid, height * 2.0)
    } else {
        mid.mix(high, (height - 0.5) * 2.0)
    }
}
