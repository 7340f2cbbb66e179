//! Chart configuration and styling types

use serde::{Deserialize, Serialize};
use vaxtrack_config::{ChartTheme, ChartsConfig};

/// Chart configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub style: ChartStyle,
}

impl ChartConfig {
    /// Builds a chart configuration from the service settings, leaving the
    /// axis labels to each chart's own defaults.
    pub fn from_settings(settings: &ChartsConfig, title: impl Into<String>) -> Self {
        let style = match settings.theme {
            ChartTheme::Dark => ChartStyle::dark_theme(),
            ChartTheme::Light => ChartStyle::light_theme(),
        };
        let mut config = Self {
            title: title.into(),
            width: settings.width,
            height: settings.height,
            x_label: None,
            y_label: None,
            style,
        };
        config.style.grid.show_x = settings.show_grid;
        config.style.grid.show_y = settings.show_grid;
        config
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            width: 900,
            height: 500,
            x_label: None,
            y_label: None,
            style: ChartStyle::default(),
        }
    }
}

/// Series color palettes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ColorScheme {
    /// Cyan-led palette matching the dashboard accent colors.
    Dashboard,
    /// Saturated palette for light backgrounds.
    Light,
    Custom(Vec<String>),
}

/// Font configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontConfig {
    pub family: String,
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 12,
        }
    }
}

/// Margin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginConfig {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 20,
            right: 20,
            bottom: 40,
            left: 60,
        }
    }
}

/// Grid line configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub show_x: bool,
    pub show_y: bool,
    pub color: Option<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            show_x: true,
            show_y: true,
            color: None,
        }
    }
}

/// Comprehensive styling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartStyle {
    pub color_scheme: ColorScheme,
    pub background_color: Option<String>,
    /// Title, axis and label color. `None` falls back to black.
    pub text_color: Option<String>,
    pub title_font: FontConfig,
    pub axis_font: FontConfig,
    pub label_font: FontConfig,
    pub margins: MarginConfig,
    pub grid: GridConfig,
}

impl ChartStyle {
    /// Dark dashboard styling: near-black background, muted gray text.
    pub fn dark_theme() -> Self {
        Self {
            background_color: Some("#0d1117".to_string()),
            text_color: Some("#8b949e".to_string()),
            grid: GridConfig {
                color: Some("#30363d".to_string()),
                ..GridConfig::default()
            },
            ..Self::default()
        }
    }

    /// Light styling for report exports.
    pub fn light_theme() -> Self {
        Self {
            color_scheme: ColorScheme::Light,
            ..Self::default()
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Dashboard,
            background_color: Some("#FFFFFF".to_string()),
            text_color: None,
            title_font: FontConfig {
                family: "sans-serif".to_string(),
                size: 16,
            },
            axis_font: FontConfig::default(),
            label_font: FontConfig::default(),
            margins: MarginConfig::default(),
            grid: GridConfig::default(),
        }
    }
}
