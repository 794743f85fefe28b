use anyhow::{Context, Result, bail};
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

use crate::domain::weather::WeatherReport;

pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Where to look up current weather.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coords { lat: f64, lon: f64 },
}

impl WeatherQuery {
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::City(name) => name.trim().to_string(),
            Self::Coords { lat, lon } => format!("{lat:.4}, {lon:.4}"),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::City(name) => vec![("q", name.trim().to_string())],
            Self::Coords { lat, lon } => vec![("lat", lat.to_string()), ("lon", lon.to_string())],
        }
    }
}

/// Thin client for the OpenWeather current-weather endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, OPENWEATHER_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("reqwest client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub async fn current(&self, query: &WeatherQuery) -> Result<WeatherReport> {
        let mut params = query.params();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        let response = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&params)
            .send()
            .await
            .context("weather request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("weather request returned {status}: {}", body.trim());
        }

        let payload: Value = response
            .json()
            .await
            .context("failed to parse weather payload")?;
        if !payload.is_object() {
            bail!("weather payload is not a JSON object");
        }

        log::info!("fetched current weather for {}", query.display_name());
        Ok(WeatherReport::from_api_value(
            &payload,
            &query.display_name(),
            Utc::now(),
        ))
    }
}
