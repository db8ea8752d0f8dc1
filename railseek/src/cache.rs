//! Caching layer for upstream responses.
//!
//! The expanded and transfer query modes re-request the same
//! (origin, destination, date) legs and the same routes while fanning
//! out, so responses are cached for a short TTL. Entries hold the
//! unfiltered parsed rows; row filters are applied on read, which
//! keeps a narrowed allowlist from polluting the cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;

use crate::api::{QueryClient, RowFilter};
use crate::domain::Train;
use crate::query::ScheduleSource;

/// Cache key for schedule lookups.
type ScheduleKey = (String, String, NaiveDate);

/// Configuration for the response cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(120),
            max_capacity: 1024,
        }
    }
}

/// Caches for the two upstream endpoints.
pub struct ScheduleCache {
    /// Parsed schedule rows keyed by (origin, destination, date).
    schedules: MokaCache<ScheduleKey, Arc<Vec<Train>>>,

    /// Intermediate stop names keyed by route identifier.
    route_stops: MokaCache<String, Arc<Vec<String>>>,
}

impl ScheduleCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let schedules = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let route_stops = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            schedules,
            route_stops,
        }
    }

    /// Number of cached schedule entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.schedules.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.schedules.invalidate_all();
        self.route_stops.invalidate_all();
    }
}

/// Query client with response caching.
///
/// Wraps a [`QueryClient`] and caches both endpoints' responses.
pub struct CachedClient {
    client: QueryClient,
    cache: ScheduleCache,
}

impl CachedClient {
    /// Create a new cached client.
    pub fn new(client: QueryClient, config: &CacheConfig) -> Self {
        Self {
            client,
            cache: ScheduleCache::new(config),
        }
    }

    /// Unfiltered schedules for a leg, from cache when fresh.
    async fn fetch_raw(&self, from_code: &str, to_code: &str, date: NaiveDate) -> Arc<Vec<Train>> {
        let key = (from_code.to_string(), to_code.to_string(), date);

        if let Some(cached) = self.cache.schedules.get(&key).await {
            return cached;
        }

        let trains = self
            .client
            .fetch_schedules(from_code, to_code, date, &RowFilter::default())
            .await;
        let entry = Arc::new(trains);
        self.cache.schedules.insert(key, entry.clone()).await;
        entry
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &QueryClient {
        &self.client
    }

    /// Number of cached schedule entries.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl ScheduleSource for CachedClient {
    async fn fetch_schedules(
        &self,
        from_code: &str,
        to_code: &str,
        date: NaiveDate,
        filter: &RowFilter,
    ) -> Vec<Train> {
        let raw = self.fetch_raw(from_code, to_code, date).await;
        raw.iter()
            .filter(|t| filter.admits(&t.no))
            .cloned()
            .collect()
    }

    async fn fetch_route_stops(&self, train: &Train, date: NaiveDate) -> Vec<String> {
        if let Some(cached) = self.cache.route_stops.get(&train.full_no).await {
            return cached.as_ref().clone();
        }

        let stops = self.client.fetch_route_stops(train, date).await;
        self.cache
            .route_stops
            .insert(train.full_no.clone(), Arc::new(stops.clone()))
            .await;
        stops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(120));
        assert_eq!(config.max_capacity, 1024);
    }

    #[tokio::test]
    async fn cache_stores_and_returns_entries() {
        let cache = ScheduleCache::new(&CacheConfig::default());
        let key = (
            "VNP".to_string(),
            "AOH".to_string(),
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
        );

        assert!(cache.schedules.get(&key).await.is_none());

        let entry: Arc<Vec<Train>> = Arc::new(Vec::new());
        cache.schedules.insert(key.clone(), entry.clone()).await;

        let hit = cache.schedules.get(&key).await.unwrap();
        assert!(Arc::ptr_eq(&hit, &entry));
    }

    #[tokio::test]
    async fn invalidate_clears_entries() {
        let cache = ScheduleCache::new(&CacheConfig::default());
        let key = (
            "VNP".to_string(),
            "AOH".to_string(),
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
        );
        cache.schedules.insert(key.clone(), Arc::new(Vec::new())).await;

        cache.invalidate_all();
        // Moka invalidation is eventually applied; a fresh get must miss.
        cache.schedules.run_pending_tasks().await;
        assert!(cache.schedules.get(&key).await.is_none());
    }
}
