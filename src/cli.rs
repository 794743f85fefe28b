#![allow(clippy::missing_errors_doc)]

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::data::openweather::WeatherQuery;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FormatArg {
    #[default]
    Text,
    Json,
}

pub const DEFAULT_TICK_INTERVAL: u64 = 60;
pub const DEFAULT_REFRESH_INTERVAL: u64 = 600;
pub const DEFAULT_CACHE_TTL: u64 = 300;

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "globe-sky",
    version,
    about = "Sun, moon and sky parameters for a weather-reactive snow globe"
)]
pub struct Cli {
    /// City name (default: from settings, else Tokyo)
    pub city: Option<String>,

    /// Direct latitude (requires --lon)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Direct longitude (requires --lat)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Manual local hour override; wraps modulo 24
    #[arg(long, allow_negative_numbers = true)]
    pub hour: Option<f64>,

    /// Skip the weather service and use the stylised 24-hour cycle
    #[arg(long)]
    pub offline: bool,

    /// OpenWeather API key (falls back to settings, then OPENWEATHER_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Override the weather API base URL
    #[arg(long)]
    pub weather_url: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,

    /// Color output policy
    #[arg(long, value_enum, default_value_t = ColorArg::Auto, conflicts_with = "no_color")]
    pub color: ColorArg,

    /// Alias for --color never
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Keep running and print a new frame every tick
    #[arg(long)]
    pub watch: bool,

    /// Seconds between recomputations in --watch mode
    #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_interval: u64,

    /// Seconds between weather refreshes in --watch mode
    #[arg(long, default_value_t = DEFAULT_REFRESH_INTERVAL, value_parser = clap::value_parser!(u64).range(1..))]
    pub refresh_interval: u64,

    /// Seconds a fetched report stays cached
    #[arg(long, default_value_t = DEFAULT_CACHE_TTL)]
    pub cache_ttl: u64,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("--lat and --lon must be provided together")
            }
            _ => {}
        }
        if let Some(hour) = self.hour
            && !hour.is_finite()
        {
            anyhow::bail!("--hour must be a finite number");
        }
        Ok(())
    }

    /// Coordinates win over a city name.
    #[must_use]
    pub fn weather_query(&self, default_city: &str) -> WeatherQuery {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return WeatherQuery::Coords { lat, lon };
        }
        WeatherQuery::City(
            self.city
                .clone()
                .unwrap_or_else(|| default_city.to_string()),
        )
    }

    #[must_use]
    pub fn effective_color_mode(&self) -> ColorArg {
        if self.no_color {
            ColorArg::Never
        } else {
            self.color
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, ColorArg, FormatArg};
    use crate::data::openweather::WeatherQuery;

    #[test]
    fn parses_negative_hour_override() {
        let cli = Cli::parse_from(["globe-sky", "--hour", "-1"]);
        assert_eq!(cli.hour, Some(-1.0));
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn defaults_match_documented_cadence() {
        let cli = Cli::parse_from(["globe-sky"]);
        assert_eq!(cli.tick_interval, 60);
        assert_eq!(cli.refresh_interval, 600);
        assert_eq!(cli.cache_ttl, 300);
        assert_eq!(cli.format, FormatArg::Text);
        assert!(!cli.watch);
    }

    #[test]
    fn rejects_zero_tick_interval() {
        assert!(Cli::try_parse_from(["globe-sky", "--tick-interval", "0"]).is_err());
    }

    #[test]
    fn lat_without_lon_fails_validation() {
        let cli = Cli::parse_from(["globe-sky", "--lat", "35.6"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn weather_query_prefers_coordinates() {
        let cli = Cli::parse_from(["globe-sky", "Oslo", "--lat", "-33.9", "--lon", "18.4"]);
        assert_eq!(
            cli.weather_query("Tokyo"),
            WeatherQuery::Coords {
                lat: -33.9,
                lon: 18.4
            }
        );

        let cli = Cli::parse_from(["globe-sky"]);
        assert_eq!(
            cli.weather_query("Tokyo"),
            WeatherQuery::City("Tokyo".to_string())
        );
    }

    #[test]
    fn effective_color_mode_prefers_no_color() {
        let cli = Cli::parse_from(["globe-sky", "--no-color"]);
        assert_eq!(cli.effective_color_mode(), ColorArg::Never);

        let cli = Cli::parse_from(["globe-sky", "--color", "always"]);
        assert_eq!(cli.effective_color_mode(), ColorArg::Always);
    }

    #[test]
    fn rejects_color_and_no_color_together() {
        let err = Cli::try_parse_from(["globe-sky", "--color", "always", "--no-color"])
            .expect_err("expected conflict");
        assert!(err.to_string().contains("--no-color"));
    }
}
