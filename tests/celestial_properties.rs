mod common;

use globe_sky::domain::celestial::{CelestialModel, CelestialState, FixedClock};
use globe_sky::domain::color::{Rgb, mix_colors};
use globe_sky::domain::weather::WeatherSnapshot;
use proptest::prelude::*;

fn model() -> CelestialModel<FixedClock> {
    CelestialModel::with_clock(FixedClock::new(0, 9))
}

fn all_finite(state: &CelestialState) -> bool {
    let scalars = [
        state.local_hour,
        state.sun_intensity,
        state.ambient_intensity,
        state.moonlight_intensity,
        state.sun_aura_intensity,
        state.moon_aura_intensity,
        state.sky_tuning.turbidity,
        state.sky_tuning.rayleigh,
        state.sky_tuning.mie_coefficient,
        state.sky_tuning.mie_directional_g,
        state.sky_tuning.exposure,
        state.star_tuning.radius,
        state.star_tuning.depth,
        state.star_tuning.factor,
        state.star_tuning.saturation,
        state.star_tuning.speed,
    ];
    state.sun_position.is_finite()
        && state.moon_position.is_finite()
        && scalars.iter().all(|v| v.is_finite())
}

fn maybe_field() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        Just(None),
        Just(Some(f64::NAN)),
        Just(Some(f64::INFINITY)),
        (1_600_000_000.0f64..1_900_000_000.0).prop_map(Some),
    ]
}

fn rgb() -> impl Strategy<Value = Rgb> {
    any::<u32>().prop_map(|packed| Rgb::from_u32(packed & 0x00ff_ffff))
}

proptest! {
    #[test]
    fn mix_clamps_out_of_range_weights(a in rgb(), b in rgb(), t in -10.0f64..10.0) {
        let mixed = mix_colors(a, b, t);
        prop_assert_eq!(mixed, mix_colors(a, b, t.clamp(0.0, 1.0)));
        for (m, x, y) in [(mixed.r, a.r, b.r), (mixed.g, a.g, b.g), (mixed.b, a.b, b.b)] {
            prop_assert!(m >= x.min(y) && m <= x.max(y));
        }
    }

    #[test]
    fn override_hours_wrap_by_whole_days(quarter in 0u32..96, days in -5i32..5, cloud in 0.0f64..100.0) {
        let weather = common::tokyo_snapshot(cloud);
        let hour = f64::from(quarter) * 0.25;
        let shifted = hour + 24.0 * f64::from(days);
        let model = model();
        prop_assert_eq!(
            model.compute(Some(&weather), common::TOKYO_NOON_MILLIS, Some(shifted)),
            model.compute(Some(&weather), common::TOKYO_NOON_MILLIS, Some(hour))
        );
    }

    #[test]
    fn compute_is_always_finite(
        timezone in prop_oneof![Just(f64::NAN), -50_400.0f64..50_400.0],
        sunrise in maybe_field(),
        sunset in maybe_field(),
        clouds in prop_oneof![Just(None), Just(Some(f64::NAN)), (-50.0f64..200.0).prop_map(Some)],
        now in -4_000_000_000_000i64..4_000_000_000_000,
        manual in prop_oneof![Just(None), Just(Some(f64::NAN)), (-100.0f64..100.0).prop_map(Some)],
        with_weather in any::<bool>(),
    ) {
        let weather = WeatherSnapshot {
            timezone_offset_seconds: timezone,
            sunrise_utc_seconds: sunrise,
            sunset_utc_seconds: sunset,
            cloud_coverage_percent: clouds,
        };
        let state = model().compute(with_weather.then_some(&weather), now, manual);
        prop_assert!(all_finite(&state), "non-finite state: {state:?}");
        prop_assert!((0.0..24.0).contains(&state.local_hour));
    }

    #[test]
    fn compute_is_deterministic(now in 0i64..4_000_000_000_000, cloud in 0.0f64..100.0) {
        let weather = common::tokyo_snapshot(cloud);
        let first = model().compute(Some(&weather), now, None);
        let second = model().compute(Some(&weather), now, None);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn tokyo_noon_sun_sits_at_its_peak() {
    let state = model().compute(
        Some(&common::tokyo_snapshot(0.0)),
        common::TOKYO_NOON_MILLIS,
        None,
    );
    assert!(!state.is_night);
    assert!((state.local_hour - 12.0).abs() < 1e-9);
    assert!((state.sun_position.y - 95.0 * 0.6).abs() < 1e-9);
    assert!((state.sun_intensity - 1.95).abs() < 1e-9);
    assert!(!state.show_stars);
}
