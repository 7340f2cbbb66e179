//! Geographic view of the latest coverage per country.

use crate::aggregate::{CountrySnapshotAggregator, DataAggregator};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vaxtrack_common::{Country, Result, VaccinationRecord};

/// Approximate geographic centroid of a country, as (latitude, longitude).
pub const fn centroid(country: Country) -> (f64, f64) {
    match country {
        Country::Usa => (39.8, -98.5),
        Country::India => (20.6, 78.9),
        Country::Brazil => (-14.2, -51.9),
        Country::Uk => (55.4, -3.4),
        Country::Germany => (51.2, 10.4),
        Country::Japan => (36.2, 138.3),
        Country::France => (46.2, 2.2),
        Country::Italy => (41.9, 12.6),
        Country::Canada => (56.1, -106.3),
        Country::Australia => (-25.3, 133.8),
        Country::SouthAfrica => (-30.6, 22.9),
        Country::Mexico => (23.6, -102.6),
    }
}

/// One bubble on the world map: latest coverage at the country centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub country: Country,
    pub latitude: f64,
    pub longitude: f64,
    pub fully_vaccinated_pct: f64,
    pub doses_administered: u64,
}

/// Aggregator for the world map bubbles.
#[derive(Debug)]
pub struct GeoAggregator;

impl GeoAggregator {
    pub fn new() -> Self {
        Self
    }
}

impl DataAggregator<GeoPoint> for GeoAggregator {
    fn aggregate(&self, records: &[VaccinationRecord]) -> Result<Vec<GeoPoint>> {
        let snapshots = CountrySnapshotAggregator::new().aggregate(records)?;

        let mut result: Vec<GeoPoint> = snapshots
            .into_iter()
            .map(|snapshot| {
                let (latitude, longitude) = centroid(snapshot.country);
                GeoPoint {
                    country: snapshot.country,
                    latitude,
                    longitude,
                    fully_vaccinated_pct: snapshot.fully_vaccinated_pct,
                    doses_administered: snapshot.doses_administered,
                }
            })
            .collect();

        result.sort_by_key(|point| point.country);

        debug!("Aggregated {} geographic points", result.len());
        Ok(result)
    }
}

impl Default for GeoAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use vaxtrack_common::VaccineType;

    fn record(day: u32, country: Country, fully: f64) -> VaccinationRecord {
        VaccinationRecord {
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            country,
            fully_vaccinated_pct: fully,
            partially_vaccinated_pct: fully + 6.0,
            doses_administered: 5_000_000,
            daily_vaccinations: 20_000,
            vaccine_type: VaccineType::AstraZeneca,
        }
    }

    #[test]
    fn test_every_country_has_a_centroid_in_range() {
        for country in Country::ALL {
            let (lat, lon) = centroid(country);
            assert!((-90.0..=90.0).contains(&lat), "{country} latitude out of range");
            assert!((-180.0..=180.0).contains(&lon), "{country} longitude out of range");
        }
    }

    #[test]
    fn test_geo_aggregation_uses_latest_record() {
        let records = vec![
            record(1, Country::Japan, 66.0),
            record(5, Country::Japan, 69.0),
            record(5, Country::Brazil, 71.0),
        ];

        let result = GeoAggregator::new().aggregate(&records).unwrap();
        assert_eq!(result.len(), 2);

        let japan = result.iter().find(|p| p.country == Country::Japan).unwrap();
        assert!((japan.fully_vaccinated_pct - 69.0).abs() < 1e-9);
        assert!((japan.latitude - 36.2).abs() < 1e-9);
        assert!((japan.longitude - 138.3).abs() < 1e-9);

        let brazil = result.iter().find(|p| p.country == Country::Brazil).unwrap();
        assert!(brazil.latitude < 0.0);
    }

    #[test]
    fn test_geo_aggregation_on_empty_input() {
        let result = GeoAggregator::new().aggregate(&[]).unwrap();
        assert!(result.is_empty());
    }
}
