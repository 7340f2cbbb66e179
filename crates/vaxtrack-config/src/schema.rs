//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::fmt;
use vaxtrack_common::{Country, VaxTrackError};

/// Main configuration structure for the VaxTrack service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Dataset configuration.
    pub data: DataConfig,
    /// Chart rendering configuration.
    pub charts: ChartsConfig,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the API listens on.
    pub bind_address: String,
    /// Timeout for outbound HTTP requests in seconds.
    pub request_timeout_seconds: u64,
}

/// Where dataset rows come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Synthetic data from the seeded generator.
    Sample,
    /// Our World in Data CSV feed, falling back to generated data on failure.
    Owid,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Sample => write!(f, "sample"),
            SourceKind::Owid => write!(f, "owid"),
        }
    }
}

/// Dataset configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Dataset source.
    pub source: SourceKind,
    /// URL of the Our World in Data CSV feed.
    pub owid_url: String,
    /// Length of the generated trailing window in days.
    pub window_days: u32,
    /// Default filter range in days when a request gives no bounds.
    pub default_range_days: u32,
    /// Default country filter when a request names no countries.
    pub default_countries: Vec<String>,
    /// Optional RNG seed for reproducible datasets.
    pub seed: Option<u64>,
    /// Time-to-live of the cached dataset in seconds.
    pub cache_ttl_seconds: u64,
    /// Maximum number of cached datasets.
    pub cache_max_entries: u64,
    /// Number of days the naive forecast projects forward.
    pub forecast_days: u32,
    /// Default row cap for the raw records endpoint.
    pub record_limit: usize,
}

/// Color themes for rendered charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartTheme {
    /// Dark dashboard theme with cyan accents.
    Dark,
    /// Light theme for reports.
    Light,
}

/// Chart rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Rendered image width in pixels.
    pub width: u32,
    /// Rendered image height in pixels.
    pub height: u32,
    /// Color theme.
    pub theme: ChartTheme,
    /// Whether to draw grid lines.
    pub show_grid: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level filter (e.g., "info", "debug").
    pub level: String,
    /// Whether to emit compact JSON-style output.
    pub json_format: bool,
    /// Optional log file path.
    pub file_path: Option<String>,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), VaxTrackError> {
        self.server
            .bind_address
            .parse::<std::net::SocketAddr>()
            .map_err(|_| {
                VaxTrackError::validation_field(
                    format!("Invalid bind address: {}", self.server.bind_address),
                    "server.bind_address",
                )
            })?;

        if self.server.request_timeout_seconds == 0 {
            return Err(VaxTrackError::validation_field(
                "Request timeout must be at least one second",
                "server.request_timeout_seconds",
            ));
        }

        if self.data.window_days == 0 {
            return Err(VaxTrackError::validation_field(
                "Generation window must cover at least one day",
                "data.window_days",
            ));
        }

        if self.data.default_range_days == 0 {
            return Err(VaxTrackError::validation_field(
                "Default filter range must cover at least one day",
                "data.default_range_days",
            ));
        }

        if self.data.forecast_days == 0 {
            return Err(VaxTrackError::validation_field(
                "Forecast horizon must cover at least one day",
                "data.forecast_days",
            ));
        }

        if self.data.cache_ttl_seconds == 0 {
            return Err(VaxTrackError::validation_field(
                "Cache TTL must be at least one second",
                "data.cache_ttl_seconds",
            ));
        }

        for name in &self.data.default_countries {
            name.parse::<Country>().map_err(|_| {
                VaxTrackError::validation_field(
                    format!("Unknown default country: {}", name),
                    "data.default_countries",
                )
            })?;
        }

        if self.data.source == SourceKind::Owid {
            url::Url::parse(&self.data.owid_url).map_err(|_| {
                VaxTrackError::validation_field(
                    format!("Invalid OWID URL: {}", self.data.owid_url),
                    "data.owid_url",
                )
            })?;
        }

        if self.charts.width < 100 || self.charts.height < 100 {
            return Err(VaxTrackError::validation_field(
                "Chart dimensions must be at least 100x100 pixels",
                "charts",
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(VaxTrackError::validation_field(
                "Log level cannot be empty",
                "logging.level",
            ));
        }

        Ok(())
    }
}
