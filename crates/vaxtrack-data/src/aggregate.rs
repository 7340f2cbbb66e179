//! Aggregation pipeline turning vaccination records into chart-ready points.

use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use tracing::{debug, instrument};
use vaxtrack_common::{Country, Result, VaccinationRecord, VaccineType};

/// Trait for aggregating records into the data points of one dashboard view.
pub trait DataAggregator<T> {
    /// Process filtered records and return aggregated data points.
    fn aggregate(&self, records: &[VaccinationRecord]) -> Result<Vec<T>>;
}

/// One point of the global coverage trend: the cross-country mean for a date.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CoveragePoint {
    pub date: NaiveDate,
    pub fully_vaccinated_pct: f64,
    pub partially_vaccinated_pct: f64,
}

/// Latest observed state of one country.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CountrySnapshot {
    pub country: Country,
    pub as_of: NaiveDate,
    pub fully_vaccinated_pct: f64,
    pub partially_vaccinated_pct: f64,
    pub doses_administered: u64,
}

/// Total vaccinations administered on one date across the selection.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DailyDosesPoint {
    pub date: NaiveDate,
    pub daily_vaccinations: u64,
}

/// Share of records attributed to one vaccine type.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VaccineMixPoint {
    pub vaccine_type: VaccineType,
    pub record_count: u64,
    pub share_pct: f64,
}

/// Coverage of one country at the end of one ISO week.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WeeklyCoveragePoint {
    pub country: Country,
    pub iso_year: i32,
    pub iso_week: u32,
    pub fully_vaccinated_pct: f64,
}

/// Day-over-day change in a country's full coverage.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DailyChangePoint {
    pub country: Country,
    pub date: NaiveDate,
    pub change_pct: f64,
}

/// Aggregator for the daily coverage trend.
#[derive(Debug)]
pub struct DailyCoverageAggregator;

impl DailyCoverageAggregator {
    pub fn new() -> Self {
        Self
    }
}

impl DataAggregator<CoveragePoint> for DailyCoverageAggregator {
    #[instrument(skip(self, records))]
    fn aggregate(&self, records: &[VaccinationRecord]) -> Result<Vec<CoveragePoint>> {
        let mut sums: HashMap<NaiveDate, (f64, f64, u32)> = HashMap::new();

        for record in records {
            let entry = sums.entry(record.date).or_insert((0.0, 0.0, 0));
            entry.0 += record.fully_vaccinated_pct;
            entry.1 += record.partially_vaccinated_pct;
            entry.2 += 1;
        }

        let mut result: Vec<CoveragePoint> = sums
            .into_iter()
            .map(|(date, (fully, partially, count))| CoveragePoint {
                date,
                fully_vaccinated_pct: fully / f64::from(count),
                partially_vaccinated_pct: partially / f64::from(count),
            })
            .collect();

        result.sort_by_key(|point| point.date);

        debug!("Aggregated {} daily coverage points", result.len());
        Ok(result)
    }
}

/// Aggregator for the per-country latest snapshot.
#[derive(Debug)]
pub struct CountrySnapshotAggregator;

impl CountrySnapshotAggregator {
    pub fn new() -> Self {
        Self
    }
}

impl DataAggregator<CountrySnapshot> for CountrySnapshotAggregator {
    #[instrument(skip(self, records))]
    fn aggregate(&self, records: &[VaccinationRecord]) -> Result<Vec<CountrySnapshot>> {
        let mut latest: HashMap<Country, &VaccinationRecord> = HashMap::new();

        for record in records {
            latest
                .entry(record.country)
                .and_modify(|current| {
                    // Later input wins on equal dates.
                    if record.date >= current.date {
                        *current = record;
                    }
                })
                .or_insert(record);
        }

        let mut result: Vec<CountrySnapshot> = latest
            .into_values()
            .map(|record| CountrySnapshot {
                country: record.country,
                as_of: record.date,
                fully_vaccinated_pct: record.fully_vaccinated_pct,
                partially_vaccinated_pct: record.partially_vaccinated_pct,
                doses_administered: record.doses_administered,
            })
            .collect();

        // Highest coverage first.
        result.sort_by(|a, b| {
            b.fully_vaccinated_pct
                .total_cmp(&a.fully_vaccinated_pct)
                .then_with(|| a.country.cmp(&b.country))
        });

        debug!("Aggregated {} country snapshots", result.len());
        Ok(result)
    }
}

/// Aggregator for daily vaccinations administered.
#[derive(Debug)]
pub struct DailyDosesAggregator;

impl DailyDosesAggregator {
    pub fn new() -> Self {
        Self
    }
}

impl DataAggregator<DailyDosesPoint> for DailyDosesAggregator {
    #[instrument(skip(self, records))]
    fn aggregate(&self, records: &[VaccinationRecord]) -> Result<Vec<DailyDosesPoint>> {
        let mut totals: HashMap<NaiveDate, u64> = HashMap::new();

        for record in records {
            *totals.entry(record.date).or_insert(0) += record.daily_vaccinations;
        }

        let mut result: Vec<DailyDosesPoint> = totals
            .into_iter()
            .map(|(date, daily_vaccinations)| DailyDosesPoint {
                date,
                daily_vaccinations,
            })
            .collect();

        result.sort_by_key(|point| point.date);

        debug!("Aggregated {} daily dose points", result.len());
        Ok(result)
    }
}

/// Aggregator for the vaccine type distribution.
#[derive(Debug)]
pub struct VaccineMixAggregator;

impl VaccineMixAggregator {
    pub fn new() -> Self {
        Self
    }
}

impl DataAggregator<VaccineMixPoint> for VaccineMixAggregator {
    #[instrument(skip(self, records))]
    fn aggregate(&self, records: &[VaccinationRecord]) -> Result<Vec<VaccineMixPoint>> {
        let mut counts: HashMap<VaccineType, u64> = HashMap::new();
        let total = records.len() as f64;

        for record in records {
            *counts.entry(record.vaccine_type).or_insert(0) += 1;
        }

        let mut result: Vec<VaccineMixPoint> = counts
            .into_iter()
            .map(|(vaccine_type, record_count)| VaccineMixPoint {
                vaccine_type,
                record_count,
                share_pct: (record_count as f64 / total) * 100.0,
            })
            .collect();

        // Sort by count descending, ties by name order.
        result.sort_by(|a, b| {
            b.record_count
                .cmp(&a.record_count)
                .then_with(|| a.vaccine_type.cmp(&b.vaccine_type))
        });

        debug!("Aggregated {} vaccine mix points", result.len());
        Ok(result)
    }
}

/// Aggregator for weekly coverage per country.
#[derive(Debug)]
pub struct WeeklyCoverageAggregator;

impl WeeklyCoverageAggregator {
    pub fn new() -> Self {
        Self
    }
}

impl DataAggregator<WeeklyCoveragePoint> for WeeklyCoverageAggregator {
    #[instrument(skip(self, records))]
    fn aggregate(&self, records: &[VaccinationRecord]) -> Result<Vec<WeeklyCoveragePoint>> {
        // Keyed on ISO year as well as week so the same week number in two
        // calendar years never collapses into one bucket.
        let mut latest: HashMap<(Country, i32, u32), &VaccinationRecord> = HashMap::new();

        for record in records {
            let iso = record.date.iso_week();
            latest
                .entry((record.country, iso.year(), iso.week()))
                .and_modify(|current| {
                    if record.date >= current.date {
                        *current = record;
                    }
                })
                .or_insert(record);
        }

        let mut result: Vec<WeeklyCoveragePoint> = latest
            .into_iter()
            .map(|((country, iso_year, iso_week), record)| WeeklyCoveragePoint {
                country,
                iso_year,
                iso_week,
                fully_vaccinated_pct: record.fully_vaccinated_pct,
            })
            .collect();

        result.sort_by_key(|point| (point.country, point.iso_year, point.iso_week));

        debug!("Aggregated {} weekly coverage points", result.len());
        Ok(result)
    }
}

/// Aggregator for the day-over-day coverage change per country.
#[derive(Debug)]
pub struct DailyChangeAggregator;

impl DailyChangeAggregator {
    pub fn new() -> Self {
        Self
    }
}

impl DataAggregator<DailyChangePoint> for DailyChangeAggregator {
    #[instrument(skip(self, records))]
    fn aggregate(&self, records: &[VaccinationRecord]) -> Result<Vec<DailyChangePoint>> {
        let mut by_country: HashMap<Country, Vec<&VaccinationRecord>> = HashMap::new();

        for record in records {
            by_country.entry(record.country).or_default().push(record);
        }

        let mut result = Vec::new();
        for (country, mut series) in by_country {
            series.sort_by_key(|record| record.date);
            // The first observation has nothing to diff against.
            for pair in series.windows(2) {
                result.push(DailyChangePoint {
                    country,
                    date: pair[1].date,
                    change_pct: pair[1].fully_vaccinated_pct - pair[0].fully_vaccinated_pct,
                });
            }
        }

        result.sort_by_key(|point| (point.country, point.date));

        debug!("Aggregated {} daily change points", result.len());
        Ok(result)
    }
}

impl Default for DailyCoverageAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for CountrySnapshotAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for DailyDosesAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for VaccineMixAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for WeeklyCoverageAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for DailyChangeAggregator {
    fn default() -> Self {
        Self::new()
    }
}
