use std::fmt::Write as _;
use std::io::IsTerminal;

use anyhow::Context;
use crossterm::style::{Color, Stylize};
use glam::DVec3;

use crate::app::session::SkyFrame;
use crate::cli::{ColorArg, FormatArg};
use crate::domain::color::Rgb;

/// Whether swatches may use truecolor escapes.
#[must_use]
pub fn color_enabled(mode: ColorArg) -> bool {
    color_enabled_from(
        mode,
        std::env::var("NO_COLOR").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
        std::io::stdout().is_terminal(),
    )
}

fn color_enabled_from(
    mode: ColorArg,
    no_color: Option<&str>,
    term: Option<&str>,
    is_terminal: bool,
) -> bool {
    match mode {
        ColorArg::Always => true,
        ColorArg::Never => false,
        ColorArg::Auto => {
            is_terminal
                && !no_color.is_some_and(|value| !value.is_empty())
                && !term.is_some_and(|value| value.eq_ignore_ascii_case("dumb"))
        }
    }
}

pub fn render_frame(frame: &SkyFrame, format: FormatArg, color: bool) -> anyhow::Result<String> {
    match format {
        FormatArg::Text => Ok(render_text(frame, color)),
        FormatArg::Json => {
            serde_json::to_string_pretty(frame).context("serializing sky frame failed")
        }
    }
}

#[must_use]
pub fn render_text(frame: &SkyFrame, color: bool) -> String {
    let state = &frame.state;
    let mut out = String::new();

    let mut header = frame.location_name.clone();
    if let Some(condition) = &frame.condition {
        let _ = write!(header, " | {condition}");
    }
    if let Some(freshness) = frame.freshness {
        let _ = write!(header, " | {}", freshness.label());
    }
    let _ = writeln!(out, "{header}");

    let _ = writeln!(
        out,
        "{:<12}{:05.2} (shown as {:02}:00), {}",
        "hour",
        state.local_hour,
        frame.display_hour,
        if state.is_night { "night" } else { "day" }
    );
    let _ = writeln!(
        out,
        "{:<12}{}  az {:.1}  el {:.1}  {}{}",
        "sun",
        vector(state.sun_position),
        frame.sun.azimuth_deg,
        frame.sun.elevation_deg,
        frame.sun.phase.label(),
        if frame.sun.visible { "" } else { " (hidden)" }
    );
    let _ = writeln!(out, "{:<12}{}", "moon", vector(state.moon_position));
    let _ = writeln!(
        out,
        "{:<12}sun {:.2}  ambient {:.2}  moonlight {:.2}",
        "intensity", state.sun_intensity, state.ambient_intensity, state.moonlight_intensity
    );
    let _ = writeln!(
        out,
        "{:<12}directional {:.2}  ambient {:.2}  weather x{:.2}",
        "lighting",
        frame.lighting.directional_intensity,
        frame.lighting.ambient_intensity,
        frame.lighting.weather_factor
    );
    let sky = &state.sky_tuning;
    let _ = writeln!(
        out,
        "{:<12}turbidity {:.2}  rayleigh {:.2}  mie {:.4}  g {:.2}  exposure {:.2}",
        "sky", sky.turbidity, sky.rayleigh, sky.mie_coefficient, sky.mie_directional_g, sky.exposure
    );
    if state.show_stars {
        let stars = &state.star_tuning;
        let _ = writeln!(
            out,
            "{:<12}{} stars  factor {:.2}  speed {:.2}",
            "stars", stars.count, stars.factor, stars.speed
        );
    } else {
        let _ = writeln!(out, "{:<12}hidden", "stars");
    }
    let _ = writeln!(
        out,
        "{:<12}sun {:.2}  moon {:.2}",
        "auras", state.sun_aura_intensity, state.moon_aura_intensity
    );

    let swatches = [
        ("background", state.background_color),
        ("sun", state.sun_color),
        ("aura", state.aura_color),
        ("ambient", state.ambient_sky_color),
        ("ground", state.ground_color),
        ("moon", state.moon_color),
        ("moon aura", frame.lighting.moon_aura_color),
    ];
    for (label, rgb) in swatches {
        let _ = writeln!(out, "{:<12}{}", label, swatch(rgb, color));
    }

    out
}

fn vector(v: DVec3) -> String {
    format!("({:7.2}, {:7.2}, {:7.2})", v.x, v.y, v.z)
}

fn swatch(rgb: Rgb, color: bool) -> String {
    if color {
        let block = "    ".on(Color::Rgb {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
        });
        format!("{block} {}", rgb.to_hex())
    } else {
        rgb.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::session::SkySession;
    use crate::data::openweather::WeatherQuery;
    use crate::domain::celestial::{CelestialModel, FixedClock};
    use chrono::{TimeZone, Utc};

    fn night_frame() -> SkyFrame {
        let session = SkySession::with_model(
            CelestialModel::with_clock(FixedClock::new(0, 0)),
            None,
            WeatherQuery::City("Tokyo".to_string()),
        )
        .with_manual_hour(Some(18.0));
        let now = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        session.frame(now)
    }

    #[test]
    fn auto_color_respects_terminal_and_no_color() {
        assert!(color_enabled_from(ColorArg::Auto, None, Some("xterm-256color"), true));
        assert!(!color_enabled_from(ColorArg::Auto, None, None, false));
        assert!(!color_enabled_from(ColorArg::Auto, Some("1"), None, true));
        assert!(color_enabled_from(ColorArg::Auto, Some(""), None, true));
        assert!(!color_enabled_from(ColorArg::Auto, None, Some("dumb"), true));
        assert!(color_enabled_from(ColorArg::Always, Some("1"), None, false));
        assert!(!color_enabled_from(ColorArg::Never, None, None, true));
    }

    #[test]
    fn plain_text_has_no_escape_codes() {
        let text = render_text(&night_frame(), false);
        assert!(!text.contains('\u{1b}'));
        assert!(text.starts_with("Tokyo\n"));
        assert!(text.contains("night"));
        assert!(text.contains("(shown as 18:00)"));
        assert!(text.lines().any(|line| line.starts_with("stars") && line.contains("stars  factor")));
    }

    #[test]
    fn colored_text_includes_truecolor_swatch() {
        let frame = night_frame();
        let text = render_text(&frame, true);
        assert!(text.contains(&frame.state.background_color.to_hex()));
        // crossterm itself suppresses colour codes under NO_COLOR.
        if std::env::var_os("NO_COLOR").is_none() {
            assert!(text.contains('\u{1b}'));
        }
    }

    #[test]
    fn json_output_uses_camel_case_fields() {
        let json = render_frame(&night_frame(), FormatArg::Json, false).expect("render json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse json");
        assert_eq!(value["locationName"], "Tokyo");
        assert_eq!(value["displayHour"], 18);
        assert_eq!(value["state"]["isNight"], true);
        assert!(value["state"]["backgroundColor"].as_str().is_some_and(|hex| hex.starts_with('#')));
        assert!(value["freshness"].is_null());
    }
}
