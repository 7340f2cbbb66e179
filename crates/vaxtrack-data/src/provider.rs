//! Dataset provisioning: source selection, caching, and refresh.

use crate::cache::{CacheConfig, DatasetCache};
use crate::generator::SampleDataGenerator;
use crate::owid::OwidClient;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};
use vaxtrack_common::{Result, VaccinationRecord};
use vaxtrack_config::{DataConfig, SourceKind};

/// Timeout for a single OWID feed download.
const OWID_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Serves the vaccination dataset from cache, loading it on demand.
///
/// With the `owid` source a failed fetch falls back to the sample
/// generator, so the dashboard keeps rendering when the feed is down.
pub struct DatasetProvider {
    config: DataConfig,
    cache: DatasetCache,
    generator: SampleDataGenerator,
    owid: Option<OwidClient>,
    last_refresh: RwLock<Option<DateTime<Utc>>>,
}

impl DatasetProvider {
    /// Create a provider for the configured data source.
    pub fn new(config: DataConfig) -> Result<Self> {
        let cache = DatasetCache::new(CacheConfig::from_data_config(&config));
        let generator = SampleDataGenerator::from_config(&config);
        let owid = match config.source {
            SourceKind::Owid => Some(OwidClient::new(
                config.owid_url.clone(),
                OWID_FETCH_TIMEOUT,
            )?),
            SourceKind::Sample => None,
        };

        Ok(Self {
            config,
            cache,
            generator,
            owid,
            last_refresh: RwLock::new(None),
        })
    }

    fn cache_key(&self) -> String {
        format!("dataset:{}", self.config.source)
    }

    /// Get the current dataset, loading and caching it when absent.
    pub async fn dataset(&self) -> Result<Arc<Vec<VaccinationRecord>>> {
        let key = self.cache_key();
        if let Some(records) = self.cache.get(&key).await {
            return Ok(records);
        }

        let records = Arc::new(self.load().await?);
        self.cache.put(key, Arc::clone(&records)).await;
        Ok(records)
    }

    /// Load the dataset from the configured source.
    async fn load(&self) -> Result<Vec<VaccinationRecord>> {
        match &self.owid {
            Some(client) => match client.fetch().await {
                Ok(records) if !records.is_empty() => Ok(records),
                Ok(_) => {
                    warn!("OWID feed had no usable rows, falling back to sample data");
                    self.generator.generate()
                }
                Err(e) => {
                    warn!(error = %e, "OWID fetch failed, falling back to sample data");
                    self.generator.generate()
                }
            },
            None => self.generator.generate(),
        }
    }

    /// Discard the cached dataset and load a fresh one.
    ///
    /// Returns the number of records in the fresh dataset.
    pub async fn refresh(&self) -> Result<usize> {
        self.cache.invalidate_all().await;
        let records = self.dataset().await?;

        let mut last = self.last_refresh.write().await;
        *last = Some(Utc::now());

        info!(record_count = records.len(), "Dataset refreshed");
        Ok(records.len())
    }

    /// Timestamp of the last explicit refresh, if any.
    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.read().await
    }

    /// Cache statistics for diagnostics.
    pub fn cache_stats(&self) -> HashMap<String, u64> {
        self.cache.stats()
    }

    /// The data configuration this provider was built from.
    pub fn config(&self) -> &DataConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaxtrack_common::Country;

    fn sample_config() -> DataConfig {
        DataConfig {
            source: SourceKind::Sample,
            window_days: 5,
            seed: Some(42),
            ..DataConfig::default()
        }
    }

    #[tokio::test]
    async fn test_sample_provider_serves_generated_dataset() {
        let provider = DatasetProvider::new(sample_config()).unwrap();
        let records = provider.dataset().await.unwrap();
        assert_eq!(records.len(), Country::ALL.len() * 6);
    }

    #[tokio::test]
    async fn test_repeated_reads_hit_the_cache() {
        let provider = DatasetProvider::new(sample_config()).unwrap();

        let first = provider.dataset().await.unwrap();
        let second = provider.dataset().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.cache_stats().get("hits"), Some(&1));
    }

    #[tokio::test]
    async fn test_refresh_replaces_cached_dataset() {
        let provider = DatasetProvider::new(sample_config()).unwrap();
        let before = provider.dataset().await.unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        let count = provider.refresh().await.unwrap();
        assert_eq!(count, before.len());

        let after = provider.dataset().await.unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(provider.last_refresh().await.is_some());
    }

    #[tokio::test]
    async fn test_last_refresh_starts_unset() {
        let provider = DatasetProvider::new(sample_config()).unwrap();
        assert!(provider.last_refresh().await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_owid_feed_falls_back_to_sample_data() {
        let config = DataConfig {
            source: SourceKind::Owid,
            // Port 9 is unassigned locally; the connection fails fast.
            owid_url: "http://127.0.0.1:9/owid.csv".to_string(),
            window_days: 5,
            seed: Some(42),
            ..DataConfig::default()
        };

        let provider = DatasetProvider::new(config).unwrap();
        let records = provider.dataset().await.unwrap();
        assert_eq!(records.len(), Country::ALL.len() * 6);
    }
}
