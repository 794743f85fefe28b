#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// 8-bit sRGB colour, formatted as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("colour `{0}` is empty")]
    Empty(String),
    #[error("colour `{0}` is not a hex triplet")]
    InvalidHex(String),
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a colour from a packed `0xRRGGBB` literal.
    #[must_use]
    pub const fn from_u32(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xff) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
        }
    }

    #[must_use]
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.to_u32())
    }

    /// Component-wise linear blend from `self` towards `other`.
    ///
    /// `t` is clamped to `[0, 1]` (NaN counts as 0), each channel is rounded.
    #[must_use]
    pub fn mix(self, other: Self, t: f64) -> Self {
        let amount = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let channel = |a: u8, b: u8| -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * amount).round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}

/// Blends two colours; see [`Rgb::mix`].
#[must_use]
pub fn mix_colors(a: Rgb, b: Rgb, t: f64) -> Rgb {
    a.mix(b, t)
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_u32())
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Accepts `#rgb`, `#rrggbb` and shorter forms padded with zeros, with or
    /// without the leading `#`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits = value.trim().trim_start_matches('#');
        if digits.is_empty() {
            return Err(ColorParseError::Empty(value.to_string()));
        }
        if digits.len() > 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex(value.to_string()));
        }

        let expanded: String = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            format!("{digits:0<6}")
        };
        let packed = u32::from_str_radix(&expanded, 16)
            .map_err(|_| ColorParseError::InvalidHex(value.to_string()))?;
        Ok(Self::from_u32(packed))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!("#ff944a".parse::<Rgb>(), Ok(Rgb::new(0xff, 0x94, 0x4a)));
        assert_eq!("abc".parse::<Rgb>(), Ok(Rgb::new(0xaa, 0xbb, 0xcc)));
        assert_eq!("#87CEEB".parse::<Rgb>(), Ok(Rgb::from_u32(0x87ceeb)));
    }

    #[test]
    fn pads_partial_hex_with_zeros() {
        assert_eq!("#12".parse::<Rgb>(), Ok(Rgb::new(0x12, 0x00, 0x00)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!("".parse::<Rgb>(), Err(ColorParseError::Empty(_))));
        assert!(matches!(
            "#zzzzzz".parse::<Rgb>(),
            Err(ColorParseError::InvalidHex(_))
        ));
        assert!(matches!(
            "#1234567".parse::<Rgb>(),
            Err(ColorParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn formats_lowercase_with_padding() {
        assert_eq!(Rgb::new(0, 0x0b, 0x18).to_hex(), "#000b18");
        assert_eq!(Rgb::from_u32(0x87ceeb).to_string(), "#87ceeb");
    }

    #[test]
    fn mix_hits_endpoints_and_midpoint() {
        let black = Rgb::new(0, 0, 0);
        let grey = Rgb::new(100, 100, 100);
        assert_eq!(black.mix(grey, 0.0), black);
        assert_eq!(black.mix(grey, 1.0), grey);
        assert_eq!(black.mix(grey, 0.5), Rgb::new(50, 50, 50));
    }

    #[test]
    fn mix_clamps_fraction() {
        let a = Rgb::from_u32(0x2f4468);
        let b = Rgb::from_u32(0x1c2944);
        assert_eq!(a.mix(b, -3.0), a);
        assert_eq!(a.mix(b, 7.5), b);
        assert_eq!(a.mix(b, f64::NAN), a);
    }

    #[test]
    fn mix_rounds_half_up() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(1, 3, 255);
        assert_eq!(a.mix(b, 0.5), Rgb::new(1, 2, 128));
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Rgb::from_u32(0x6eb7ff)).unwrap();
        assert_eq!(json, "\"#6eb7ff\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::from_u32(0x6eb7ff));
    }
}
