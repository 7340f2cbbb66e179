//! Core domain types shared across the VaxTrack service

use crate::error::{Result, VaxTrackError};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Countries tracked by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "USA")]
    Usa,
    India,
    Brazil,
    #[serde(rename = "UK")]
    Uk,
    Germany,
    Japan,
    France,
    Italy,
    Canada,
    Australia,
    #[serde(rename = "South Africa")]
    SouthAfrica,
    Mexico,
}

impl Country {
    /// All tracked countries in canonical order
    pub const ALL: [Country; 12] = [
        Country::Usa,
        Country::India,
        Country::Brazil,
        Country::Uk,
        Country::Germany,
        Country::Japan,
        Country::France,
        Country::Italy,
        Country::Canada,
        Country::Australia,
        Country::SouthAfrica,
        Country::Mexico,
    ];

    /// Canonical display name
    pub fn name(&self) -> &'static str {
        match self {
            Country::Usa => "USA",
            Country::India => "India",
            Country::Brazil => "Brazil",
            Country::Uk => "UK",
            Country::Germany => "Germany",
            Country::Japan => "Japan",
            Country::France => "France",
            Country::Italy => "Italy",
            Country::Canada => "Canada",
            Country::Australia => "Australia",
            Country::SouthAfrica => "South Africa",
            Country::Mexico => "Mexico",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Country {
    type Err = VaxTrackError;

    /// Parses canonical names plus the long-form aliases used by upstream feeds
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "USA" | "United States" | "United States of America" => Ok(Country::Usa),
            "India" => Ok(Country::India),
            "Brazil" => Ok(Country::Brazil),
            "UK" | "United Kingdom" => Ok(Country::Uk),
            "Germany" => Ok(Country::Germany),
            "Japan" => Ok(Country::Japan),
            "France" => Ok(Country::France),
            "Italy" => Ok(Country::Italy),
            "Canada" => Ok(Country::Canada),
            "Australia" => Ok(Country::Australia),
            "South Africa" => Ok(Country::SouthAfrica),
            "Mexico" => Ok(Country::Mexico),
            other => Err(VaxTrackError::validation_field(
                format!("Unknown country: {}", other),
                "country",
            )),
        }
    }
}

/// Vaccine products appearing in the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VaccineType {
    Pfizer,
    Moderna,
    AstraZeneca,
    Sinovac,
    #[serde(rename = "Johnson&Johnson")]
    JohnsonJohnson,
}

impl VaccineType {
    /// All vaccine types in sampling order
    pub const ALL: [VaccineType; 5] = [
        VaccineType::Pfizer,
        VaccineType::Moderna,
        VaccineType::AstraZeneca,
        VaccineType::Sinovac,
        VaccineType::JohnsonJohnson,
    ];

    /// Canonical display name
    pub fn name(&self) -> &'static str {
        match self {
            VaccineType::Pfizer => "Pfizer",
            VaccineType::Moderna => "Moderna",
            VaccineType::AstraZeneca => "AstraZeneca",
            VaccineType::Sinovac => "Sinovac",
            VaccineType::JohnsonJohnson => "Johnson&Johnson",
        }
    }
}

impl fmt::Display for VaccineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One dataset row: vaccination figures for a country on a calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccinationRecord {
    pub date: NaiveDate,
    pub country: Country,
    /// Share of population fully vaccinated, 0..=95
    pub fully_vaccinated_pct: f64,
    /// Share of population with at least one dose, fully..=100
    pub partially_vaccinated_pct: f64,
    pub doses_administered: u64,
    pub daily_vaccinations: u64,
    pub vaccine_type: VaccineType,
}

/// Inclusive calendar-day range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range; `start` must not be after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(VaxTrackError::validation_field(
                format!("Range start {} is after end {}", start, end),
                "date_range",
            ));
        }
        Ok(Self { start, end })
    }

    /// Trailing window ending at `anchor`, covering `days` days back plus the anchor itself
    pub fn trailing(anchor: NaiveDate, days: u32) -> Self {
        Self {
            start: anchor - Duration::days(i64::from(days)),
            end: anchor,
        }
    }

    /// Both endpoints count as inside the range
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered, endpoints inclusive
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Country filter: either every tracked country or an explicit subset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountrySelection {
    All,
    Only(Vec<Country>),
}

impl CountrySelection {
    /// Builds a selection from display names; "all" (any case) or an empty
    /// list selects every country
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Ok(CountrySelection::All);
        }
        let mut countries = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if name.trim().eq_ignore_ascii_case("all") {
                return Ok(CountrySelection::All);
            }
            countries.push(name.parse::<Country>()?);
        }
        Ok(CountrySelection::Only(countries))
    }

    /// Whether the given country passes the filter
    pub fn matches(&self, country: Country) -> bool {
        match self {
            CountrySelection::All => true,
            // An empty explicit subset behaves like no filter at all
            CountrySelection::Only(countries) => {
                countries.is_empty() || countries.contains(&country)
            }
        }
    }

    /// True when the selection does not restrict the country axis
    pub fn is_unrestricted(&self) -> bool {
        match self {
            CountrySelection::All => true,
            CountrySelection::Only(countries) => countries.is_empty(),
        }
    }
}

impl Default for CountrySelection {
    fn default() -> Self {
        CountrySelection::All
    }
}
