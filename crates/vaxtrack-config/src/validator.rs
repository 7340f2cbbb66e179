//! Standalone configuration validation.

use crate::loader::ConfigError;
use crate::schema::Config;

/// Validates configuration values beyond what deserialization enforces.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration, returning a description of the first problem found.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        config
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }
}
