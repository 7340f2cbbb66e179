//! Synthetic vaccination dataset generation.
//!
//! Produces one record per country per day over a trailing window. Coverage
//! follows a linear upward trend with Gaussian noise so the charts look like
//! a plausible rollout rather than a flat line.

use chrono::{Duration, NaiveDate, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use tracing::debug;
use vaxtrack_common::{Country, Result, VaccinationRecord, VaccineType, VaxTrackError};
use vaxtrack_config::DataConfig;

/// Daily upward drift applied to coverage percentages.
const COVERAGE_DRIFT_PER_DAY: f64 = 0.1;

/// Standard deviation of the Gaussian noise on coverage percentages.
const COVERAGE_NOISE_STD_DEV: f64 = 2.0;

/// Sampling weights for vaccine types, aligned with [`VaccineType::ALL`].
const VACCINE_WEIGHTS: [f64; 5] = [0.4, 0.3, 0.15, 0.1, 0.05];

/// Generator for the synthetic sample dataset.
#[derive(Debug, Clone)]
pub struct SampleDataGenerator {
    window_days: u32,
    seed: Option<u64>,
}

impl SampleDataGenerator {
    /// Create a generator covering `window_days` days before the anchor date.
    ///
    /// With a seed the output is fully deterministic; without one each call
    /// draws from OS entropy.
    pub fn new(window_days: u32, seed: Option<u64>) -> Self {
        Self { window_days, seed }
    }

    /// Create a generator from the data section of the service configuration.
    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(config.window_days, config.seed)
    }

    /// Generate records for the window ending at today's UTC date.
    pub fn generate(&self) -> Result<Vec<VaccinationRecord>> {
        self.generate_ending_at(Utc::now().date_naive())
    }

    /// Generate records for the window ending at `end` (inclusive).
    ///
    /// Every country gets `window_days + 1` consecutive records, the last
    /// one dated `end`.
    pub fn generate_ending_at(&self, end: NaiveDate) -> Result<Vec<VaccinationRecord>> {
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let noise = Normal::new(0.0, COVERAGE_NOISE_STD_DEV)
            .map_err(|e| VaxTrackError::new(format!("Failed to build noise distribution: {e}")))?;
        let vaccine_dist = WeightedIndex::new(VACCINE_WEIGHTS)
            .map_err(|e| VaxTrackError::new(format!("Failed to build vaccine weights: {e}")))?;

        let start = end - Duration::days(i64::from(self.window_days));
        let days_per_country = self.window_days as usize + 1;
        let mut records = Vec::with_capacity(Country::ALL.len() * days_per_country);

        for country in Country::ALL {
            let base_rate = match country {
                Country::Usa => 75.0,
                Country::India => 65.0,
                Country::Brazil => 70.0,
                _ => f64::from(rng.gen_range(60..85)),
            };

            for offset in 0..=i64::from(self.window_days) {
                let date = start + Duration::days(offset);
                let fully = (base_rate + offset as f64 * COVERAGE_DRIFT_PER_DAY
                    + noise.sample(&mut rng))
                .min(95.0)
                .max(0.0);
                let partially = (fully + f64::from(rng.gen_range(5..15))).min(100.0);

                records.push(VaccinationRecord {
                    date,
                    country,
                    fully_vaccinated_pct: fully,
                    partially_vaccinated_pct: partially,
                    doses_administered: rng.gen_range(100_000.0..10_000_000.0) as u64,
                    daily_vaccinations: rng.gen_range(5_000.0..500_000.0) as u64,
                    vaccine_type: VaccineType::ALL[vaccine_dist.sample(&mut rng)],
                });
            }
        }

        debug!(
            record_count = records.len(),
            start = %start,
            end = %end,
            seeded = self.seed.is_some(),
            "Generated sample dataset"
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn test_record_count_covers_every_country_and_day() {
        let generator = SampleDataGenerator::new(365, Some(42));
        let records = generator.generate_ending_at(anchor()).unwrap();
        assert_eq!(records.len(), Country::ALL.len() * 366);
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let generator = SampleDataGenerator::new(30, Some(42));
        let first = generator.generate_ending_at(anchor()).unwrap();
        let second = generator.generate_ending_at(anchor()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let first = SampleDataGenerator::new(30, Some(1))
            .generate_ending_at(anchor())
            .unwrap();
        let second = SampleDataGenerator::new(30, Some(2))
            .generate_ending_at(anchor())
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_values_stay_within_bounds() {
        let generator = SampleDataGenerator::new(120, Some(7));
        for record in generator.generate_ending_at(anchor()).unwrap() {
            assert!(record.fully_vaccinated_pct >= 0.0);
            assert!(record.fully_vaccinated_pct <= 95.0);
            assert!(record.partially_vaccinated_pct >= record.fully_vaccinated_pct);
            assert!(record.partially_vaccinated_pct <= 100.0);
            assert!(record.doses_administered >= 100_000);
            assert!(record.doses_administered < 10_000_000);
            assert!(record.daily_vaccinations >= 5_000);
            assert!(record.daily_vaccinations < 500_000);
        }
    }

    #[test]
    fn test_each_country_spans_full_window() {
        let generator = SampleDataGenerator::new(10, Some(3));
        let records = generator.generate_ending_at(anchor()).unwrap();
        let start = anchor() - Duration::days(10);

        for country in Country::ALL {
            let dates: Vec<NaiveDate> = records
                .iter()
                .filter(|r| r.country == country)
                .map(|r| r.date)
                .collect();
            assert_eq!(dates.len(), 11);
            assert_eq!(dates.first().copied(), Some(start));
            assert_eq!(dates.last().copied(), Some(anchor()));
            for pair in dates.windows(2) {
                assert_eq!(pair[1] - pair[0], Duration::days(1));
            }
        }
    }

    #[test]
    fn test_vaccine_mix_favors_heavier_weights() {
        let generator = SampleDataGenerator::new(365, Some(42));
        let records = generator.generate_ending_at(anchor()).unwrap();
        let pfizer = records
            .iter()
            .filter(|r| r.vaccine_type == VaccineType::Pfizer)
            .count();
        let jj = records
            .iter()
            .filter(|r| r.vaccine_type == VaccineType::JohnsonJohnson)
            .count();
        assert!(pfizer > jj, "expected Pfizer ({pfizer}) to outnumber J&J ({jj})");
    }

    #[test]
    fn test_unseeded_generator_still_produces_full_dataset() {
        let generator = SampleDataGenerator::new(5, None);
        let records = generator.generate_ending_at(anchor()).unwrap();
        assert_eq!(records.len(), Country::ALL.len() * 6);
    }
}
