//! TTL cache for the vaccination dataset.
//!
//! The dataset is regenerated (or re-fetched) at most once per TTL window;
//! every request in between reuses the cached records through an `Arc`.

use moka::future::Cache;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};
use vaxtrack_common::VaccinationRecord;
use vaxtrack_config::DataConfig;

/// Configuration for the dataset cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in cache.
    pub max_capacity: u64,
    /// Time-to-live for cache entries.
    pub ttl: Duration,
}

impl CacheConfig {
    /// Derive cache settings from the data section of the configuration.
    pub fn from_data_config(config: &DataConfig) -> Self {
        Self {
            max_capacity: config.cache_max_entries,
            ttl: Duration::from_secs(config.cache_ttl_seconds),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 8,
            ttl: Duration::from_secs(3600), // 1 hour
        }
    }
}

/// Cache performance metrics.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub invalidations: AtomicU64,
}

impl CacheMetrics {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let total = hits + self.misses.load(Ordering::Relaxed) as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }

    pub fn get_stats(&self) -> HashMap<String, u64> {
        let mut stats = HashMap::new();
        stats.insert("hits".to_string(), self.hits.load(Ordering::Relaxed));
        stats.insert("misses".to_string(), self.misses.load(Ordering::Relaxed));
        stats.insert(
            "invalidations".to_string(),
            self.invalidations.load(Ordering::Relaxed),
        );
        stats
    }
}

/// TTL cache holding loaded datasets keyed by source description.
pub struct DatasetCache {
    cache: Cache<String, Arc<Vec<VaccinationRecord>>>,
    metrics: Arc<CacheMetrics>,
}

impl DatasetCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .build();

        Self {
            cache,
            metrics: Arc::new(CacheMetrics::default()),
        }
    }

    /// Get a dataset from cache if present and not expired.
    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Option<Arc<Vec<VaccinationRecord>>> {
        if let Some(records) = self.cache.get(key).await {
            debug!("Cache hit for key: {}", key);
            self.metrics.record_hit();
            Some(records)
        } else {
            debug!("Cache miss for key: {}", key);
            self.metrics.record_miss();
            None
        }
    }

    /// Store a dataset in the cache.
    #[instrument(skip(self, records))]
    pub async fn put(&self, key: String, records: Arc<Vec<VaccinationRecord>>) {
        debug!(record_count = records.len(), "Storing dataset in cache for key: {}", key);
        self.cache.insert(key, records).await;
    }

    /// Invalidate one cached dataset.
    #[instrument(skip(self))]
    pub async fn invalidate(&self, key: &str) {
        info!("Invalidating cached dataset for key: {}", key);
        self.cache.invalidate(key).await;
        self.metrics.record_invalidation();
    }

    /// Invalidate every cached dataset.
    #[instrument(skip(self))]
    pub async fn invalidate_all(&self) {
        let entry_count = self.cache.entry_count();
        self.cache.invalidate_all();
        self.metrics
            .invalidations
            .fetch_add(entry_count, Ordering::Relaxed);
        info!("Invalidated {} cached datasets", entry_count);
    }

    /// Get cache metrics.
    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Get cache statistics for diagnostics.
    pub fn stats(&self) -> HashMap<String, u64> {
        let mut stats = self.metrics.get_stats();
        stats.insert("entry_count".to_string(), self.cache.entry_count());
        stats
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use vaxtrack_common::{Country, VaccineType};

    fn sample_dataset() -> Arc<Vec<VaccinationRecord>> {
        Arc::new(vec![VaccinationRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            country: Country::Usa,
            fully_vaccinated_pct: 70.0,
            partially_vaccinated_pct: 78.0,
            doses_administered: 1_000_000,
            daily_vaccinations: 25_000,
            vaccine_type: VaccineType::Pfizer,
        }])
    }

    #[tokio::test]
    async fn test_cache_basic_operations() {
        let cache = DatasetCache::new(CacheConfig::default());

        assert!(cache.get("dataset:sample").await.is_none());

        cache.put("dataset:sample".to_string(), sample_dataset()).await;
        let cached = cache.get("dataset:sample").await;
        assert!(cached.is_some());
        assert_eq!(cached.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_returns_shared_dataset() {
        let cache = DatasetCache::new(CacheConfig::default());
        let dataset = sample_dataset();

        cache.put("dataset:sample".to_string(), Arc::clone(&dataset)).await;
        let cached = cache.get("dataset:sample").await.unwrap();
        assert!(Arc::ptr_eq(&dataset, &cached));
    }

    #[tokio::test]
    async fn test_cache_metrics_track_hits_and_misses() {
        let cache = DatasetCache::new(CacheConfig::default());

        cache.get("dataset:sample").await;
        assert_eq!(cache.metrics().get_stats().get("misses"), Some(&1));
        assert_eq!(cache.metrics().get_stats().get("hits"), Some(&0));

        cache.put("dataset:sample".to_string(), sample_dataset()).await;
        cache.get("dataset:sample").await;
        assert_eq!(cache.metrics().get_stats().get("hits"), Some(&1));
        assert!(cache.metrics().hit_rate() > 0.0);
    }

    #[tokio::test]
    async fn test_invalidation_removes_entry() {
        let cache = DatasetCache::new(CacheConfig::default());

        cache.put("dataset:sample".to_string(), sample_dataset()).await;
        cache.invalidate("dataset:sample").await;
        assert!(cache.get("dataset:sample").await.is_none());
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = DatasetCache::new(CacheConfig {
            max_capacity: 8,
            ttl: Duration::from_millis(50),
        });

        cache.put("dataset:sample".to_string(), sample_dataset()).await;
        assert!(cache.get("dataset:sample").await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get("dataset:sample").await.is_none());
    }
}
