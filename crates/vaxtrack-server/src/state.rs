//! Shared state for the HTTP API

use std::sync::Arc;

use vaxtrack_common::Result;
use vaxtrack_config::Config;
use vaxtrack_data::{DatasetProvider, StatisticsCalculator};

/// Shared application state for all API handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded service configuration
    pub config: Arc<Config>,
    /// Provider serving the cached dataset
    pub provider: Arc<DatasetProvider>,
    /// Calculator for summary and statistics endpoints
    pub stats: Arc<StatisticsCalculator>,
}

impl AppState {
    /// Build the shared state from a loaded configuration
    pub fn new(config: Config) -> Result<Self> {
        let provider = DatasetProvider::new(config.data.clone())?;

        Ok(Self {
            config: Arc::new(config),
            provider: Arc::new(provider),
            stats: Arc::new(StatisticsCalculator::new()),
        })
    }
}
