//! Client for the Our World in Data vaccination feed.
//!
//! The feed is a wide CSV with one row per location and day. Only the
//! columns the dashboard uses are read; rows for locations outside the
//! tracked country set are skipped.

use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use vaxtrack_common::{Result, VaccinationRecord, VaccineType};

/// One row of the OWID CSV, limited to the columns the dashboard consumes.
#[derive(Debug, Deserialize)]
struct OwidRow {
    location: String,
    date: NaiveDate,
    people_fully_vaccinated_per_hundred: Option<f64>,
    people_vaccinated_per_hundred: Option<f64>,
    total_vaccinations: Option<f64>,
    daily_vaccinations: Option<f64>,
}

/// HTTP client for the OWID vaccination dataset.
pub struct OwidClient {
    client: reqwest::Client,
    url: String,
}

impl OwidClient {
    /// Create a client fetching from `url` with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Fetch and parse the feed in a single attempt.
    pub async fn fetch(&self) -> Result<Vec<VaccinationRecord>> {
        info!(url = %self.url, "Fetching OWID vaccination data");

        let response = self.client.get(&self.url).send().await?;
        let body = response.error_for_status()?.text().await?;
        let records = Self::parse_csv(&body)?;

        info!(record_count = records.len(), "Fetched OWID vaccination data");
        Ok(records)
    }

    /// Parse the feed body into vaccination records.
    ///
    /// Rows are skipped when the location is not a tracked country or when
    /// full coverage is missing. The feed does not break doses down by
    /// vaccine type, so every record is tagged with the dominant one.
    fn parse_csv(body: &str) -> Result<Vec<VaccinationRecord>> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(body.as_bytes());
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for row in reader.deserialize::<OwidRow>() {
            let row = row?;

            let Ok(country) = row.location.parse() else {
                skipped += 1;
                continue;
            };
            let Some(fully) = row.people_fully_vaccinated_per_hundred else {
                skipped += 1;
                continue;
            };

            records.push(VaccinationRecord {
                date: row.date,
                country,
                fully_vaccinated_pct: fully,
                partially_vaccinated_pct: row.people_vaccinated_per_hundred.unwrap_or(fully),
                doses_administered: row.total_vaccinations.unwrap_or(0.0) as u64,
                daily_vaccinations: row.daily_vaccinations.unwrap_or(0.0) as u64,
                vaccine_type: VaccineType::Pfizer,
            });
        }

        debug!(
            record_count = records.len(),
            skipped_rows = skipped,
            "Parsed OWID CSV body"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaxtrack_common::Country;

    const FIXTURE: &str = "\
location,date,total_vaccinations,people_vaccinated_per_hundred,people_fully_vaccinated_per_hundred,daily_vaccinations,extra_column
United States,2024-01-01,500000000,82.5,75.1,150000,ignored
United Kingdom,2024-01-01,120000000,80.0,73.4,60000,ignored
Wakanda,2024-01-01,1000,50.0,40.0,10,ignored
Germany,2024-01-01,150000000,77.0,,45000,ignored
India,2024-01-02,2000000000,,68.2,,ignored
";

    #[test]
    fn test_parse_keeps_tracked_countries_only() {
        let records = OwidClient::parse_csv(FIXTURE).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].country, Country::Usa);
        assert_eq!(records[1].country, Country::Uk);
        assert_eq!(records[2].country, Country::India);
    }

    #[test]
    fn test_parse_maps_feed_columns() {
        let records = OwidClient::parse_csv(FIXTURE).unwrap();

        let usa = &records[0];
        assert_eq!(usa.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!((usa.fully_vaccinated_pct - 75.1).abs() < 1e-9);
        assert!((usa.partially_vaccinated_pct - 82.5).abs() < 1e-9);
        assert_eq!(usa.doses_administered, 500_000_000);
        assert_eq!(usa.daily_vaccinations, 150_000);
    }

    #[test]
    fn test_parse_defaults_missing_optional_columns() {
        let records = OwidClient::parse_csv(FIXTURE).unwrap();

        // India's row has no partial coverage or daily count.
        let india = &records[2];
        assert!((india.partially_vaccinated_pct - india.fully_vaccinated_pct).abs() < 1e-9);
        assert_eq!(india.daily_vaccinations, 0);
    }

    #[test]
    fn test_parse_skips_rows_without_full_coverage() {
        let records = OwidClient::parse_csv(FIXTURE).unwrap();
        assert!(records.iter().all(|r| r.country != Country::Germany));
    }

    #[test]
    fn test_parse_empty_body_yields_no_records() {
        assert!(OwidClient::parse_csv("").unwrap().is_empty());
    }

    #[test]
    fn test_client_construction() {
        let client = OwidClient::new(
            "https://covid.ourworldindata.org/data/owid-covid-data.csv",
            Duration::from_secs(30),
        );
        assert!(client.is_ok());
    }
}
