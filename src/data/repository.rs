use std::num::NonZeroUsize;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use lru::LruCache;

use crate::data::openweather::{WeatherClient, WeatherQuery};
use crate::domain::weather::WeatherReport;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;
const CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(32).unwrap();

#[derive(Debug, Clone)]
struct CachedReport {
    report: WeatherReport,
    stored_at: DateTime<Utc>,
}

/// Weather lookups with a fixed time-to-live cache in front of the client.
#[derive(Debug)]
pub struct WeatherRepository {
    client: WeatherClient,
    cache: LruCache<String, CachedReport>,
    ttl: Duration,
}

#[must_use]
pub fn cache_key(query: &WeatherQuery) -> String {
    match query {
        WeatherQuery::City(name) => format!("weather:{}", name.trim().to_lowercase()),
        WeatherQuery::Coords { lat, lon } => format!("weather:{lat:.4},{lon:.4}"),
    }
}

impl WeatherRepository {
    pub fn new(client: WeatherClient, ttl_secs: u64) -> Self {
        Self {
            client,
            cache: LruCache::new(CACHE_CAPACITY),
            ttl: Duration::try_seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX))
                .unwrap_or(Duration::MAX),
        }
    }

    /// Current weather for `query`; served from cache while the entry is
    /// younger than the TTL. `use_cache = false` neither reads nor writes it.
    pub async fn weather(&mut self, query: &WeatherQuery, use_cache: bool) -> Result<WeatherReport> {
        let key = cache_key(query);
        if use_cache && let Some(report) = self.cached(&key, Utc::now()) {
            log::debug!("weather cache hit for {key}");
            return Ok(report);
        }

        let report = self.client.current(query).await?;
        if use_cache {
            self.store(key, report.clone(), Utc::now());
        }
        Ok(report)
    }

    pub fn clear_cache(&mut self, query: &WeatherQuery) {
        self.cache.pop(&cache_key(query));
    }

    pub fn clear_all_cache(&mut self) {
        self.cache.clear();
    }

    fn cached(&mut self, key: &str, now: DateTime<Utc>) -> Option<WeatherReport> {
        let entry = self.cache.get(key)?;
        if now - entry.stored_at > self.ttl {
            self.cache.pop(key);
            return None;
        }
        Some(entry.report.clone())
    }

    fn store(&mut self, key: String, report: WeatherReport, now: DateTime<Utc>) {
        self.cache.put(
            key,
            CachedReport {
                report,
                stored_at: now,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weather::WeatherSnapshot;

    fn report(name: &str) -> WeatherReport {
        WeatherReport {
            location_name: name.to_string(),
            condition: Some("Clear".to_string()),
            observed_at: None,
            snapshot: WeatherSnapshot::default(),
            fetched_at: Utc::now(),
        }
    }

    fn repository() -> WeatherRepository {
        WeatherRepository::new(
            WeatherClient::with_base_url("key", "http://127.0.0.1:9"),
            DEFAULT_CACHE_TTL_SECS,
        )
    }

    #[test]
    fn city_keys_ignore_case_and_whitespace() {
        assert_eq!(
            cache_key(&WeatherQuery::City("  Tokyo ".to_string())),
            "weather:tokyo"
        );
        assert_eq!(
            cache_key(&WeatherQuery::Coords {
                lat: 35.68,
                lon: 139.76
            }),
            "weather:35.6800,139.7600"
        );
    }

    #[test]
    fn entries_expire_after_ttl() {
        let mut repo = repository();
        let stored_at = Utc::now();
        repo.store("weather:tokyo".to_string(), report("Tokyo"), stored_at);

        let fresh = repo.cached("weather:tokyo", stored_at + Duration::minutes(5));
        assert_eq!(fresh.map(|r| r.location_name), Some("Tokyo".to_string()));

        let expired = repo.cached("weather:tokyo", stored_at + Duration::seconds(301));
        assert!(expired.is_none());
        // Expired entries are dropped, not just skipped.
        assert!(repo.cached("weather:tokyo", stored_at).is_none());
    }

    #[test]
    fn clear_cache_removes_single_city() {
        let mut repo = repository();
        let now = Utc::now();
        repo.store("weather:tokyo".to_string(), report("Tokyo"), now);
        repo.store("weather:oslo".to_string(), report("Oslo"), now);

        repo.clear_cache(&WeatherQuery::City("TOKYO".to_string()));
        assert!(repo.cached("weather:tokyo", now).is_none());
        assert!(repo.cached("weather:oslo", now).is_some());

        repo.clear_all_cache();
        assert!(repo.cached("weather:oslo", now).is_none());
    }
}
