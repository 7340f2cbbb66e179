//! Date-range and country filtering of vaccination records.

use tracing::debug;
use vaxtrack_common::{CountrySelection, DateRange, VaccinationRecord};

/// Filter criteria applied to a dataset before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    /// Inclusive date range to keep.
    pub range: DateRange,
    /// Countries to keep.
    pub countries: CountrySelection,
}

impl FilterParams {
    /// Create filter parameters from a range and a country selection.
    pub fn new(range: DateRange, countries: CountrySelection) -> Self {
        Self { range, countries }
    }

    /// Return the records matching both criteria, preserving input order.
    pub fn apply(&self, records: &[VaccinationRecord]) -> Vec<VaccinationRecord> {
        let filtered: Vec<VaccinationRecord> = records
            .iter()
            .filter(|r| self.range.contains(r.date) && self.countries.matches(r.country))
            .cloned()
            .collect();

        debug!(
            input = records.len(),
            output = filtered.len(),
            range = %self.range,
            "Applied dataset filter"
        );

        filtered
    }
}
