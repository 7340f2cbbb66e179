//! Naive linear projection of vaccination coverage.
//!
//! The projection extends the mean coverage of the filtered table with a
//! fixed daily drift plus a small Gaussian wobble, bracketed by a constant
//! confidence band. It is intentionally simple model-wise; the point is a
//! plausible forward curve for the dashboard, not an epidemiological model.

use chrono::{Duration, NaiveDate};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vaxtrack_common::{Result, VaccinationRecord, VaxTrackError};

/// Daily drift added to the projected coverage.
const FORECAST_DRIFT_PER_DAY: f64 = 0.15;

/// Standard deviation of the noise on each projected value.
const FORECAST_NOISE_STD_DEV: f64 = 0.5;

/// Half-width of the confidence band around each projected value.
const FORECAST_BAND_HALF_WIDTH: f64 = 2.0;

/// One projected coverage value with its confidence band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_pct: f64,
    pub lower_bound_pct: f64,
    pub upper_bound_pct: f64,
}

/// Complete forecast result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageForecast {
    /// Mean observed coverage of the filtered table the projection starts from.
    pub baseline_pct: f64,
    /// Projected points, the first one dated at the projection start.
    pub points: Vec<ForecastPoint>,
}

/// Forecaster for the coverage projection view.
#[derive(Debug, Clone)]
pub struct CoverageForecaster {
    horizon_days: u32,
    seed: Option<u64>,
}

impl CoverageForecaster {
    /// Create a forecaster projecting `horizon_days` points forward.
    pub fn new(horizon_days: u32, seed: Option<u64>) -> Self {
        Self { horizon_days, seed }
    }

    /// Project coverage forward from the mean coverage of `records`.
    ///
    /// The first point is dated at `start` (the end of the filter range).
    /// Returns a validation error when `records` is empty; there is nothing
    /// to anchor the projection on.
    pub fn forecast(
        &self,
        records: &[VaccinationRecord],
        start: NaiveDate,
    ) -> Result<CoverageForecast> {
        if records.is_empty() {
            return Err(VaxTrackError::validation(
                "Cannot forecast from an empty dataset",
            ));
        }

        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let noise = Normal::new(0.0, FORECAST_NOISE_STD_DEV)
            .map_err(|e| VaxTrackError::new(format!("Failed to build noise distribution: {e}")))?;

        let baseline = records
            .iter()
            .map(|r| r.fully_vaccinated_pct)
            .sum::<f64>()
            / records.len() as f64;
        let mut points = Vec::with_capacity(self.horizon_days as usize);
        for offset in 0..i64::from(self.horizon_days) {
            let predicted =
                baseline + offset as f64 * FORECAST_DRIFT_PER_DAY + noise.sample(&mut rng);
            points.push(ForecastPoint {
                date: start + Duration::days(offset),
                predicted_pct: predicted,
                lower_bound_pct: predicted - FORECAST_BAND_HALF_WIDTH,
                upper_bound_pct: predicted + FORECAST_BAND_HALF_WIDTH,
            });
        }

        debug!(
            baseline_pct = baseline,
            points = points.len(),
            "Computed coverage forecast"
        );

        Ok(CoverageForecast {
            baseline_pct: baseline,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaxtrack_common::{Country, VaccineType};

    fn record(date: (i32, u32, u32), country: Country, fully: f64) -> VaccinationRecord {
        VaccinationRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            country,
            fully_vaccinated_pct: fully,
            partially_vaccinated_pct: fully + 5.0,
            doses_administered: 1_000_000,
            daily_vaccinations: 40_000,
            vaccine_type: VaccineType::Pfizer,
        }
    }

    fn sample() -> Vec<VaccinationRecord> {
        vec![
            record((2024, 5, 1), Country::Usa, 70.0),
            record((2024, 5, 1), Country::India, 60.0),
            record((2024, 5, 2), Country::Usa, 72.0),
            record((2024, 5, 2), Country::India, 62.0),
        ]
    }

    fn range_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
    }

    #[test]
    fn test_forecast_anchors_on_table_mean() {
        let forecast = CoverageForecaster::new(30, Some(42))
            .forecast(&sample(), range_end())
            .unwrap();

        // Mean over all four records, not just the last day's 67.0.
        assert_eq!(forecast.points.len(), 30);
        assert!((forecast.baseline_pct - 66.0).abs() < 1e-9);
        assert_eq!(forecast.points[0].date, range_end());
        assert_eq!(
            forecast.points[29].date,
            NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()
        );
    }

    #[test]
    fn test_forecast_starts_at_range_end_past_last_observation() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let forecast = CoverageForecaster::new(5, Some(42))
            .forecast(&sample(), start)
            .unwrap();

        assert_eq!(forecast.points[0].date, start);
        assert_eq!(
            forecast.points[4].date,
            NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
        );
    }

    #[test]
    fn test_forecast_band_has_constant_width() {
        let forecast = CoverageForecaster::new(10, Some(1))
            .forecast(&sample(), range_end())
            .unwrap();

        for point in &forecast.points {
            assert!((point.upper_bound_pct - point.lower_bound_pct - 4.0).abs() < 1e-9);
            assert!(point.lower_bound_pct < point.predicted_pct);
            assert!(point.upper_bound_pct > point.predicted_pct);
        }
    }

    #[test]
    fn test_forecast_trends_upward_over_horizon() {
        let forecast = CoverageForecaster::new(30, Some(7))
            .forecast(&sample(), range_end())
            .unwrap();

        let first = forecast.points.first().unwrap().predicted_pct;
        let last = forecast.points.last().unwrap().predicted_pct;
        // 29 days of drift dwarfs the per-point noise.
        assert!(last > first);
        assert!((first - forecast.baseline_pct).abs() < 5.0);
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let forecaster = CoverageForecaster::new(14, Some(99));
        let first = forecaster.forecast(&sample(), range_end()).unwrap();
        let second = forecaster.forecast(&sample(), range_end()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let result = CoverageForecaster::new(30, Some(42)).forecast(&[], range_end());
        assert!(result.is_err());
    }
}
