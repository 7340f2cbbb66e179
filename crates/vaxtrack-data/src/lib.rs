//! Dataset generation, filtering, aggregation, and caching for VaxTrack.
//!
//! This crate owns everything between the raw vaccination records and the
//! HTTP layer: the synthetic sample generator, the OWID fetch fallback, the
//! TTL cache, the per-view aggregators, forecasting, summary statistics, and
//! CSV export.

pub mod aggregate;
pub mod cache;
pub mod export;
pub mod filter;
pub mod forecast;
pub mod generator;
pub mod geo;
pub mod owid;
pub mod provider;
pub mod stats;

pub use aggregate::{
    CountrySnapshot, CountrySnapshotAggregator, CoveragePoint, DailyChangeAggregator,
    DailyChangePoint, DailyCoverageAggregator, DailyDosesAggregator, DailyDosesPoint,
    DataAggregator, VaccineMixAggregator, VaccineMixPoint, WeeklyCoverageAggregator,
    WeeklyCoveragePoint,
};
pub use cache::{CacheConfig, CacheMetrics, DatasetCache};
pub use export::CsvExporter;
pub use filter::FilterParams;
pub use forecast::{CoverageForecast, CoverageForecaster, ForecastPoint};
pub use generator::SampleDataGenerator;
pub use geo::{GeoAggregator, GeoPoint};
pub use owid::OwidClient;
pub use provider::DatasetProvider;
pub use stats::{DatasetStatistics, FieldStatistics, HeadlineSummary, StatisticsCalculator};
