//! Configuration loading with TOML files and environment overrides.

use crate::schema::{Config, SourceKind};
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use vaxtrack_common::Result as VaxResult;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading the configuration file.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment variable parsing error.
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParse {
        /// The offending variable name.
        var: String,
        /// The underlying parse error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration validation error.
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

impl From<ConfigError> for vaxtrack_common::VaxTrackError {
    fn from(err: ConfigError) -> Self {
        vaxtrack_common::VaxTrackError::config(err.to_string())
    }
}

/// Configuration loader for the service.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file with environment variable overrides.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = toml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;

        config
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load configuration from the usual locations, falling back to defaults.
    ///
    /// Lookup order: `VAXTRACK_CONFIG_PATH`, then `vaxtrack.toml` in the
    /// working directory, then built-in defaults with env overrides applied.
    pub fn load() -> VaxResult<Config> {
        let config = if let Ok(config_path) = env::var("VAXTRACK_CONFIG_PATH") {
            Self::load_config(&config_path)?
        } else if Path::new("vaxtrack.toml").exists() {
            Self::load_config("vaxtrack.toml")?
        } else {
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config
                .validate()
                .map_err(|e| ConfigError::Validation(e.to_string()))?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> VaxResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply environment variable overrides to the configuration.
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        if let Ok(bind) = env::var("VAXTRACK_BIND_ADDRESS") {
            config.server.bind_address = bind;
        }

        if let Ok(source) = env::var("VAXTRACK_DATA_SOURCE") {
            config.data.source = match source.to_lowercase().as_str() {
                "sample" => SourceKind::Sample,
                "owid" => SourceKind::Owid,
                other => {
                    return Err(ConfigError::EnvParse {
                        var: "VAXTRACK_DATA_SOURCE".to_string(),
                        source: format!("unknown source '{}'", other).into(),
                    })
                }
            };
        }

        if let Ok(url) = env::var("VAXTRACK_OWID_URL") {
            config.data.owid_url = url;
        }

        if let Ok(seed) = env::var("VAXTRACK_SEED") {
            config.data.seed = Some(seed.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::EnvParse {
                    var: "VAXTRACK_SEED".to_string(),
                    source: Box::new(e),
                }
            })?);
        }

        if let Ok(window) = env::var("VAXTRACK_WINDOW_DAYS") {
            config.data.window_days =
                window.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::EnvParse {
                        var: "VAXTRACK_WINDOW_DAYS".to_string(),
                        source: Box::new(e),
                    }
                })?;
        }

        if let Ok(ttl) = env::var("VAXTRACK_CACHE_TTL") {
            config.data.cache_ttl_seconds =
                ttl.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::EnvParse {
                        var: "VAXTRACK_CACHE_TTL".to_string(),
                        source: Box::new(e),
                    }
                })?;
        }

        if let Ok(countries) = env::var("VAXTRACK_DEFAULT_COUNTRIES") {
            config.data.default_countries = countries
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(level) = env::var("VAXTRACK_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}
