use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessState {
    Fresh,
    Stale,
    Offline,
}

impl FreshnessState {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Stale => "stale",
            Self::Offline => "offline",
        }
    }
}

/// Judges how far the sky can trust the last weather report.
#[must_use]
pub fn evaluate_freshness(
    last_success: Option<DateTime<Utc>>,
    consecutive_failures: u32,
    now: DateTime<Utc>,
) -> FreshnessState {
    let Some(last_success) = last_success else {
        return if consecutive_failures >= 3 {
            FreshnessState::Offline
        } else {
            FreshnessState::Stale
        };
    };

    let age = now - last_success;

    if age > Duration::minutes(30) || consecutive_failures >= 3 {
        FreshnessState::Offline
    } else if age > Duration::minutes(10) || consecutive_failures >= 1 {
        FreshnessState::Stale
    } else {
        FreshnessState::Fresh
    }
}
