use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::openweather::WeatherQuery;
use crate::data::repository::WeatherRepository;
use crate::domain::celestial::{CelestialModel, CelestialState, Clock, SystemClock};
use crate::domain::lighting::SceneLighting;
use crate::domain::sun_phase::{SunReading, display_hour};
use crate::domain::weather::WeatherReport;
use crate::resilience::freshness::{FreshnessState, evaluate_freshness};

/// Everything one recomputation produces, ready to print.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkyFrame {
    pub location_name: String,
    pub condition: Option<String>,
    pub computed_at_millis: i64,
    pub display_hour: u8,
    pub state: CelestialState,
    pub lighting: SceneLighting,
    pub sun: SunReading,
    /// `None` when the session runs without a weather source.
    pub freshness: Option<FreshnessState>,
}

/// Ties the weather repository to the celestial model and remembers the last
/// good report across refreshes.
#[derive(Debug)]
pub struct SkySession<C = SystemClock> {
    model: CelestialModel<C>,
    repository: Option<WeatherRepository>,
    query: WeatherQuery,
    manual_hour: Option<f64>,
    report: Option<WeatherReport>,
    last_success: Option<DateTime<Utc>>,
    consecutive_failures: u32,
    last_error: Option<String>,
}

impl SkySession<SystemClock> {
    pub fn new(repository: Option<WeatherRepository>, query: WeatherQuery) -> Self {
        Self::with_model(CelestialModel::new(), repository, query)
    }
}

impl<C: Clock> SkySession<C> {
    pub fn with_model(
        model: CelestialModel<C>,
        repository: Option<WeatherRepository>,
        query: WeatherQuery,
    ) -> Self {
        Self {
            model,
            repository,
            query,
            manual_hour: None,
            report: None,
            last_success: None,
            consecutive_failures: 0,
            last_error: None,
        }
    }

    #[must_use]
    pub fn with_manual_hour(mut self, manual_hour: Option<f64>) -> Self {
        self.manual_hour = manual_hour;
        self
    }

    pub fn set_manual_hour(&mut self, manual_hour: Option<f64>) {
        self.manual_hour = manual_hour;
    }

    #[must_use]
    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn is_offline_mode(&self) -> bool {
        self.repository.is_none()
    }

    /// Fetches fresh weather. A failure keeps the previous report in place;
    /// the returned flag says whether the fetch succeeded.
    pub async fn refresh(&mut self, use_cache: bool) -> bool {
        let Some(repository) = self.repository.as_mut() else {
            return false;
        };
        let result = repository.weather(&self.query, use_cache).await;
        self.apply_fetch(result, Utc::now())
    }

    fn apply_fetch(&mut self, result: anyhow::Result<WeatherReport>, now: DateTime<Utc>) -> bool {
        match result {
            Ok(report) => {
                self.report = Some(report);
                self.last_success = Some(now);
                self.consecutive_failures = 0;
                self.last_error = None;
                true
            }
            Err(err) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                log::warn!(
                    "weather refresh for {} failed ({} in a row): {err:#}",
                    self.query.display_name(),
                    self.consecutive_failures
                );
                self.last_error = Some(format!("{err:#}"));
                false
            }
        }
    }

    #[must_use]
    pub fn frame(&self, now: DateTime<Utc>) -> SkyFrame {
        let snapshot = self.report.as_ref().map(|report| &report.snapshot);
        let state = self
            .model
            .compute(snapshot, now.timestamp_millis(), self.manual_hour);
        let lighting = SceneLighting::derive(&state, self.report.as_ref().map(WeatherReport::category));
        let freshness = self
            .repository
            .as_ref()
            .map(|_| evaluate_freshness(self.last_success, self.consecutive_failures, now));

        SkyFrame {
            location_name: self.report.as_ref().map_or_else(
                || self.query.display_name(),
                |report| report.location_name.clone(),
            ),
            condition: self.report.as_ref().and_then(|report| report.condition.clone()),
            computed_at_millis: now.timestamp_millis(),
            display_hour: display_hour(state.local_hour),
            sun: SunReading::from_position(state.sun_position),
            lighting,
            state,
            freshness,
        }
    }
}
