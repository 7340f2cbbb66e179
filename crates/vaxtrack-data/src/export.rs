//! CSV export of vaccination records.

use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;
use tracing::debug;
use vaxtrack_common::{Result, VaccinationRecord, VaxTrackError};

/// CSV serialization for dataset downloads.
pub struct CsvExporter;

impl CsvExporter {
    /// Serialize records to CSV with a header row.
    pub fn to_csv(records: &[VaccinationRecord]) -> Result<String> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        for record in records {
            writer.serialize(record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| VaxTrackError::new(format!("Failed to flush CSV writer: {e}")))?;
        let csv = String::from_utf8(bytes)
            .map_err(|e| VaxTrackError::new(format!("CSV output was not valid UTF-8: {e}")))?;

        debug!(record_count = records.len(), "Serialized dataset to CSV");
        Ok(csv)
    }

    /// Parse records from CSV produced by [`CsvExporter::to_csv`].
    pub fn from_csv(data: &str) -> Result<Vec<VaccinationRecord>> {
        let mut reader = ReaderBuilder::new().from_reader(data.as_bytes());
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }

    /// Write records to a CSV file on disk.
    pub fn write_to_file<P: AsRef<Path>>(records: &[VaccinationRecord], path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path.as_ref())?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        debug!(
            record_count = records.len(),
            path = %path.as_ref().display(),
            "Wrote dataset to CSV file"
        );
        Ok(())
    }

    /// Download filename for an export made on `date`.
    pub fn export_filename(date: NaiveDate) -> String {
        format!("vaccination_data_{}.csv", date.format("%Y%m%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaxtrack_common::{Country, VaccineType};

    fn sample() -> Vec<VaccinationRecord> {
        vec![
            VaccinationRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                country: Country::SouthAfrica,
                fully_vaccinated_pct: 63.25,
                partially_vaccinated_pct: 71.5,
                doses_administered: 4_321_000,
                daily_vaccinations: 87_654,
                vaccine_type: VaccineType::JohnsonJohnson,
            },
            VaccinationRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                country: Country::Usa,
                fully_vaccinated_pct: 75.0,
                partially_vaccinated_pct: 83.0,
                doses_administered: 9_000_000,
                daily_vaccinations: 250_000,
                vaccine_type: VaccineType::Pfizer,
            },
        ]
    }

    #[test]
    fn test_csv_round_trip_preserves_records() {
        let records = sample();
        let csv = CsvExporter::to_csv(&records).unwrap();
        let parsed = CsvExporter::from_csv(&csv).unwrap();
        assert_eq!(records, parsed);
    }

    #[test]
    fn test_csv_has_header_and_display_names() {
        let csv = CsvExporter::to_csv(&sample()).unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("date,country,fully_vaccinated_pct"));

        let first = lines.next().unwrap();
        assert!(first.contains("South Africa"));
        assert!(first.contains("Johnson&Johnson"));
        assert!(first.contains("2024-01-01"));
    }

    #[test]
    fn test_empty_dataset_round_trips_to_empty() {
        let csv = CsvExporter::to_csv(&[]).unwrap();
        assert!(CsvExporter::from_csv(&csv).unwrap().is_empty());
    }

    #[test]
    fn test_export_filename_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(CsvExporter::export_filename(date), "vaccination_data_20240307.csv");
    }

    #[test]
    fn test_write_to_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("export.csv");
        let records = sample();

        CsvExporter::write_to_file(&records, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(CsvExporter::from_csv(&contents).unwrap(), records);
    }

    #[test]
    fn test_malformed_csv_is_rejected() {
        let bad = "date,country\n2024-01-01,Narnia\n";
        assert!(CsvExporter::from_csv(bad).is_err());
    }
}
