//! Default values for every configuration section.

use crate::schema::*;

/// Default Our World in Data CSV feed.
pub const DEFAULT_OWID_URL: &str = "https://covid.ourworldindata.org/data/owid-covid-data.csv";

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            data: DataConfig::default(),
            charts: ChartsConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Sample,
            owid_url: DEFAULT_OWID_URL.to_string(),
            window_days: 365,
            default_range_days: 180,
            default_countries: vec![
                "USA".to_string(),
                "India".to_string(),
                "Brazil".to_string(),
                "UK".to_string(),
            ],
            seed: None,
            cache_ttl_seconds: 3600,
            cache_max_entries: 8,
            forecast_days: 30,
            record_limit: 1000,
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 500,
            theme: ChartTheme::Dark,
            show_grid: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_data_section() {
        let data = DataConfig::default();
        assert_eq!(data.source, SourceKind::Sample);
        assert_eq!(data.window_days, 365);
        assert_eq!(data.default_range_days, 180);
        assert_eq!(data.cache_ttl_seconds, 3600);
        assert_eq!(data.forecast_days, 30);
        assert_eq!(data.default_countries.len(), 4);
        assert!(data.seed.is_none());
    }
}
