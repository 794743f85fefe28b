use serde::Serialize;

use crate::domain::celestial::CelestialState;
use crate::domain::color::Rgb;
use crate::domain::weather::{WeatherCategory, light_factor};

const MOON_AURA_TINT: Rgb = Rgb::from_u32(0x6f7ab1);
const MOON_AURA_TINT_AMOUNT: f64 = 0.4;
/// Lift applied to the daytime ambient light on top of the weather factor.
const DAY_AMBIENT_LIFT: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CelestialBody {
    Sun,
    Moon,
}

/// Light levels after the current weather condition is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneLighting {
    pub visible_body: CelestialBody,
    pub weather_factor: f64,
    pub directional_intensity: f64,
    pub ambient_intensity: f64,
    pub moon_aura_color: Rgb,
}

impl SceneLighting {
    /// `category` is `None` when no weather has been loaded.
    #[must_use]
    pub fn derive(state: &CelestialState, category: Option<WeatherCategory>) -> Self {
        let weather_factor = category.map_or(1.0, light_factor);
        let ambient_scale = if state.is_night {
            1.0
        } else {
            weather_factor + DAY_AMBIENT_LIFT
        };

        Self {
            visible_body: if state.is_night {
                CelestialBody::Moon
            } else {
                CelestialBody::Sun
            },
            weather_factor,
            directional_intensity: state.sun_intensity * weather_factor,
            ambient_intensity: state.ambient_intensity * ambient_scale,
            moon_aura_color: state.moon_color.mix(MOON_AURA_TINT, MOON_AURA_TINT_AMOUNT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn no_weather_keeps_full_light() {
        let state = CelestialState::fallback(12.0);
        let lighting = SceneLighting::derive(&state, None);
        assert_eq!(lighting.visible_body, CelestialBody::Sun);
        assert!(approx(lighting.directional_intensity, 1.1));
        assert!(approx(lighting.ambient_intensity, 0.55 * 1.35));
    }

    #[test]
    fn rain_dims_day_light() {
        let state = CelestialState::fallback(12.0);
        let lighting = SceneLighting::derive(&state, Some(WeatherCategory::Rain));
        assert!(approx(lighting.weather_factor, 0.45));
        assert!(approx(lighting.directional_intensity, 1.1 * 0.45));
        assert!(approx(lighting.ambient_intensity, 0.55 * 0.8));
    }

    #[test]
    fn night_ambient_ignores_weather() {
        let state = CelestialState {
            is_night: true,
            ..CelestialState::fallback(23.0)
        };
        let lighting = SceneLighting::derive(&state, Some(WeatherCategory::Thunder));
        assert_eq!(lighting.visible_body, CelestialBody::Moon);
        assert!(approx(lighting.ambient_intensity, 0.55));
    }

    #[test]
    fn moon_aura_is_tinted_towards_blue() {
        let state = CelestialState::fallback(0.0);
        let lighting = SceneLighting::derive(&state, None);
        assert_eq!(
            lighting.moon_aura_color,
            Rgb::from_u32(0xf2f6ff).mix(MOON_AURA_TINT, 0.4)
        );
    }
}
