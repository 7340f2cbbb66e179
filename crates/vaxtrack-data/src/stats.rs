//! Summary statistics over vaccination records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;
use vaxtrack_common::VaccinationRecord;

/// Statistical indicators for one numeric field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldStatistics {
    /// Number of values.
    pub count: usize,
    /// Mean value, NaN when empty.
    pub mean: f64,
    /// Population standard deviation, NaN when empty.
    pub std_dev: f64,
    /// Minimum value, NaN when empty.
    pub min: f64,
    /// Maximum value, NaN when empty.
    pub max: f64,
    /// Median value, NaN when empty.
    pub median: f64,
    /// Sum of all values.
    pub sum: f64,
}

impl FieldStatistics {
    /// Compute statistics over a slice of values.
    ///
    /// An empty slice yields count 0, sum 0, and NaN for the remaining
    /// indicators. NaN serializes to JSON `null`, which is what the API
    /// reports for an empty selection.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                count: 0,
                mean: f64::NAN,
                std_dev: f64::NAN,
                min: f64::NAN,
                max: f64::NAN,
                median: f64::NAN,
                sum: 0.0,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = values.len();
        let sum: f64 = values.iter().sum();
        let mean = sum / count as f64;
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };
        let variance: f64 =
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[count - 1],
            median,
            sum,
        }
    }
}

/// Per-field statistics over a filtered dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStatistics {
    pub record_count: usize,
    pub fully_vaccinated_pct: FieldStatistics,
    pub partially_vaccinated_pct: FieldStatistics,
    pub daily_vaccinations: FieldStatistics,
    pub doses_administered: FieldStatistics,
}

/// Headline numbers for the dashboard summary cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlineSummary {
    /// Mean full coverage across all selected records.
    pub average_fully_vaccinated_pct: f64,
    /// Mean partial coverage across all selected records.
    pub average_partially_vaccinated_pct: f64,
    /// Sum of doses administered across all selected records.
    pub total_doses_administered: u64,
    /// Number of distinct countries in the selection.
    pub country_count: usize,
    /// Most recent date in the selection.
    pub latest_date: Option<NaiveDate>,
    /// Number of selected records.
    pub record_count: usize,
}

/// Calculator for dashboard statistics.
#[derive(Debug)]
pub struct StatisticsCalculator;

impl StatisticsCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Compute per-field statistics over the given records.
    pub fn dataset_statistics(&self, records: &[VaccinationRecord]) -> DatasetStatistics {
        let fully: Vec<f64> = records.iter().map(|r| r.fully_vaccinated_pct).collect();
        let partially: Vec<f64> = records.iter().map(|r| r.partially_vaccinated_pct).collect();
        let daily: Vec<f64> = records.iter().map(|r| r.daily_vaccinations as f64).collect();
        let doses: Vec<f64> = records.iter().map(|r| r.doses_administered as f64).collect();

        debug!(record_count = records.len(), "Computed dataset statistics");

        DatasetStatistics {
            record_count: records.len(),
            fully_vaccinated_pct: FieldStatistics::from_values(&fully),
            partially_vaccinated_pct: FieldStatistics::from_values(&partially),
            daily_vaccinations: FieldStatistics::from_values(&daily),
            doses_administered: FieldStatistics::from_values(&doses),
        }
    }

    /// Compute the headline numbers for the summary cards.
    pub fn headline_summary(&self, records: &[VaccinationRecord]) -> HeadlineSummary {
        let count = records.len();
        let countries: HashSet<_> = records.iter().map(|r| r.country).collect();
        let (fully_sum, partially_sum) = records.iter().fold((0.0, 0.0), |(f, p), r| {
            (f + r.fully_vaccinated_pct, p + r.partially_vaccinated_pct)
        });

        HeadlineSummary {
            average_fully_vaccinated_pct: fully_sum / count as f64,
            average_partially_vaccinated_pct: partially_sum / count as f64,
            total_doses_administered: records.iter().map(|r| r.doses_administered).sum(),
            country_count: countries.len(),
            latest_date: records.iter().map(|r| r.date).max(),
            record_count: count,
        }
    }
}

impl Default for StatisticsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaxtrack_common::{Country, VaccineType};

    fn record(date: (i32, u32, u32), country: Country, fully: f64, doses: u64) -> VaccinationRecord {
        VaccinationRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            country,
            fully_vaccinated_pct: fully,
            partially_vaccinated_pct: fully + 10.0,
            doses_administered: doses,
            daily_vaccinations: 30_000,
            vaccine_type: VaccineType::Moderna,
        }
    }

    #[test]
    fn test_field_statistics_on_known_values() {
        let stats = FieldStatistics::from_values(&[10.0, 15.0, 12.0, 18.0, 20.0]);

        assert_eq!(stats.count, 5);
        assert!((stats.mean - 15.0).abs() < 1e-9);
        assert!((stats.median - 15.0).abs() < 1e-9);
        assert!((stats.min - 10.0).abs() < 1e-9);
        assert!((stats.max - 20.0).abs() < 1e-9);
        assert!((stats.sum - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_field_statistics_even_count_median() {
        let stats = FieldStatistics::from_values(&[1.0, 2.0, 3.0, 4.0]);
        assert!((stats.median - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_field_statistics_on_empty_slice() {
        let stats = FieldStatistics::from_values(&[]);

        assert_eq!(stats.count, 0);
        assert_eq!(stats.sum, 0.0);
        assert!(stats.mean.is_nan());
        assert!(stats.median.is_nan());
        assert!(stats.min.is_nan());
    }

    #[test]
    fn test_nan_serializes_to_null() {
        let stats = FieldStatistics::from_values(&[]);
        let value = serde_json::to_value(&stats).unwrap();
        assert!(value["mean"].is_null());
        assert_eq!(value["count"], 0);
    }

    #[test]
    fn test_single_value_has_zero_std_dev() {
        let stats = FieldStatistics::from_values(&[42.0]);
        assert!((stats.std_dev - 0.0).abs() < 1e-9);
        assert!((stats.median - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_headline_summary_over_fixture() {
        let records = vec![
            record((2024, 4, 1), Country::Usa, 70.0, 1_000_000),
            record((2024, 4, 2), Country::Usa, 72.0, 2_000_000),
            record((2024, 4, 2), Country::Germany, 64.0, 3_000_000),
        ];

        let summary = StatisticsCalculator::new().headline_summary(&records);

        assert!((summary.average_fully_vaccinated_pct - (70.0 + 72.0 + 64.0) / 3.0).abs() < 1e-9);
        assert_eq!(summary.total_doses_administered, 6_000_000);
        assert_eq!(summary.country_count, 2);
        assert_eq!(summary.latest_date, NaiveDate::from_ymd_opt(2024, 4, 2));
        assert_eq!(summary.record_count, 3);
    }

    #[test]
    fn test_headline_summary_on_empty_selection() {
        let summary = StatisticsCalculator::new().headline_summary(&[]);

        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.country_count, 0);
        assert_eq!(summary.total_doses_administered, 0);
        assert_eq!(summary.latest_date, None);
        assert!(summary.average_fully_vaccinated_pct.is_nan());
    }

    #[test]
    fn test_dataset_statistics_covers_all_fields() {
        let records = vec![
            record((2024, 4, 1), Country::Usa, 70.0, 1_000_000),
            record((2024, 4, 2), Country::India, 60.0, 2_000_000),
        ];

        let stats = StatisticsCalculator::new().dataset_statistics(&records);

        assert_eq!(stats.record_count, 2);
        assert!((stats.fully_vaccinated_pct.mean - 65.0).abs() < 1e-9);
        assert!((stats.partially_vaccinated_pct.mean - 75.0).abs() < 1e-9);
        assert!((stats.doses_administered.sum - 3_000_000.0).abs() < 1e-9);
        assert_eq!(stats.daily_vaccinations.count, 2);
    }
}
