//! Common utilities and types for the VaxTrack dashboard service

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, VaxTrackError};
pub use logging::{init_default_logging, init_dev_logging, init_logging, LoggingConfig};
pub use types::{
    Country, CountrySelection, DateRange, VaccinationRecord, VaccineType,
};
