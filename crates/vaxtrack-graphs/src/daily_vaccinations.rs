//! Daily administered doses area chart

use crate::{ChartConfig, ChartRenderer};
use chrono::NaiveDate;
use plotters::prelude::*;
use vaxtrack_common::{Result, VaxTrackError};
use vaxtrack_data::DailyDosesPoint;

/// Area chart of total doses administered per day across the selection
#[derive(Debug)]
pub struct DailyVaccinationsChart {
    /// Summed daily dose counts, ordered by date
    pub data: Vec<DailyDosesPoint>,
}

impl DailyVaccinationsChart {
    /// Create an empty daily doses chart
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Set chart data from aggregated daily totals
    pub fn set_data(&mut self, data: Vec<DailyDosesPoint>) {
        self.data = data;
    }

    /// Convert data to plotters-compatible format
    fn prepare_plot_data(&self) -> Vec<(f64, f64)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, point)| (i as f64, point.daily_vaccinations as f64))
            .collect()
    }

    /// Get max dose count for y-axis scaling
    fn get_max_doses(&self) -> f64 {
        if self.data.is_empty() {
            return 10.0; // Default value for empty data
        }
        self.data
            .iter()
            .map(|p| p.daily_vaccinations as f64)
            .fold(0.0, f64::max)
            * 1.1 // Add 10% padding
    }

    /// Axis label for an index position, blank between data points
    fn date_label(&self, x: f64) -> String {
        let idx = x.round();
        if idx < 0.0 || (x - idx).abs() > 0.25 {
            return String::new();
        }
        self.data
            .get(idx as usize)
            .map(|p| p.date.format("%b %d").to_string())
            .unwrap_or_default()
    }
}

/// Compact tick label for large dose counts
fn format_count(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}k", value / 1_000.0)
    } else {
        format!("{value:.0}")
    }
}

impl ChartRenderer for DailyVaccinationsChart {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, plotters::coord::Shift>,
        config: &ChartConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        if self.data.is_empty() {
            return Err(VaxTrackError::chart("No data to render"));
        }
        self.apply_background(root, config)?;

        let text_color = self.get_text_color(config);
        let plot_data = self.prepare_plot_data();
        let max_x = self.data.len().saturating_sub(1).max(1) as f64;
        let max_y = self.get_max_doses();

        let title_style = (
            config.style.title_font.family.as_str(),
            config.style.title_font.size,
        )
            .into_font()
            .color(&text_color);

        let mut chart = ChartBuilder::on(root)
            .caption(&config.title, title_style)
            .margin(config.style.margins.top)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(0f64..max_x, 0f64..max_y)?;

        let x_formatter = |x: &f64| self.date_label(*x);
        let y_formatter = |y: &f64| format_count(*y);
        let label_style = (
            config.style.axis_font.family.as_str(),
            config.style.axis_font.size,
        )
            .into_font()
            .color(&text_color);

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(config.x_label.as_deref().unwrap_or("Date"))
            .y_desc(config.y_label.as_deref().unwrap_or("Doses Administered"))
            .x_labels(10)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .label_style(label_style)
            .axis_style(text_color)
            .light_line_style(self.get_grid_color(config).mix(0.4));

        if config.style.grid.show_x && config.style.grid.show_y {
            mesh.draw()?;
        } else if config.style.grid.show_x {
            mesh.disable_y_mesh().draw()?;
        } else if config.style.grid.show_y {
            mesh.disable_x_mesh().draw()?;
        } else {
            mesh.disable_mesh().draw()?;
        }

        let colors = self.get_colors(&config.style.color_scheme);
        let primary_color = colors.first().copied().unwrap_or(RGBColor(0, 212, 255));

        chart.draw_series(
            AreaSeries::new(plot_data.iter().copied(), 0.0, primary_color.mix(0.3))
                .border_style(primary_color.stroke_width(2)),
        )?;

        Ok(())
    }
}

impl Default for DailyVaccinationsChart {
    fn default() -> Self {
        Self::new()
    }
}
