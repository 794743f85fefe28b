use glam::DVec3;
use serde::Serialize;

/// Below this elevation (civil twilight) the sun marker is hidden.
const VISIBLE_ELEVATION_DEG: f64 = -6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SunPhase {
    Night,
    SunriseSunset,
    MorningEvening,
    Day,
    Noon,
}

impl SunPhase {
    #[must_use]
    pub fn from_elevation(elevation_deg: f64) -> Self {
        if elevation_deg <= 0.0 {
            Self::Night
        } else if elevation_deg < 10.0 {
            Self::SunriseSunset
        } else if elevation_deg < 30.0 {
            Self::MorningEvening
        } else if elevation_deg < 60.0 {
            Self::Day
        } else {
            Self::Noon
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Night => "Night",
            Self::SunriseSunset => "Sunrise/Sunset",
            Self::MorningEvening => "Morning/Evening",
            Self::Day => "Day",
            Self::Noon => "Noon",
        }
    }
}

/// Compass view of a sun position on the sky sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SunReading {
    /// Degrees clockwise from +Z, `[0, 360)`.
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub phase: SunPhase,
    pub visible: bool,
}

impl SunReading {
    #[must_use]
    pub fn from_position(position: DVec3) -> Self {
        let azimuth_deg = (position.x.atan2(position.z).to_degrees() + 360.0) % 360.0;
        let ground_distance = position.x.hypot(position.z);
        let elevation_deg = position.y.atan2(ground_distance).to_degrees();
        Self {
            azimuth_deg,
            elevation_deg,
            phase: SunPhase::from_elevation(elevation_deg),
            visible: elevation_deg > VISIBLE_ELEVATION_DEG,
        }
    }
}

/// Whole hour shown next to the readout.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn display_hour(local_hour: f64) -> u8 {
    let wrapped = ((local_hour % 24.0) + 24.0) % 24.0;
    wrapped.floor().clamp(0.0, 23.0) as u8
}
