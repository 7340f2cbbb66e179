//! Vaccination coverage trend line chart

use crate::{ChartConfig, ChartRenderer};
use chrono::NaiveDate;
use plotters::prelude::*;
use vaxtrack_common::{Result, VaxTrackError};
use vaxtrack_data::CoveragePoint;

/// Line chart of mean daily coverage across the selected countries
///
/// Draws one series for fully vaccinated and one for partially vaccinated
/// population shares.
#[derive(Debug)]
pub struct CoverageTrendChart {
    /// Daily mean coverage points, ordered by date
    pub data: Vec<CoveragePoint>,
    /// Start date for the chart
    pub start_date: Option<NaiveDate>,
    /// End date for the chart
    pub end_date: Option<NaiveDate>,
}

impl CoverageTrendChart {
    /// Create an empty trend chart
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            start_date: None,
            end_date: None,
        }
    }

    /// Set chart data from aggregated coverage points
    pub fn set_data(&mut self, data: Vec<CoveragePoint>) {
        self.data = data;
        // Update date range based on data if not explicitly set
        if self.start_date.is_none() {
            self.start_date = self.data.iter().map(|p| p.date).min();
        }
        if self.end_date.is_none() {
            self.end_date = self.data.iter().map(|p| p.date).max();
        }
    }

    /// Convert data to plotters-compatible series, indexed on the x axis
    fn prepare_plot_data(&self) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
        let fully = self
            .data
            .iter()
            .enumerate()
            .map(|(i, point)| (i as f64, point.fully_vaccinated_pct))
            .collect();
        let partially = self
            .data
            .iter()
            .enumerate()
            .map(|(i, point)| (i as f64, point.partially_vaccinated_pct))
            .collect();
        (fully, partially)
    }

    /// Get max coverage for y-axis scaling
    fn get_max_coverage(&self) -> f64 {
        if self.data.is_empty() {
            return 10.0; // Default value for empty data
        }
        self.data
            .iter()
            .map(|p| p.fully_vaccinated_pct.max(p.partially_vaccinated_pct))
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

impl ChartRenderer for CoverageTrendChart {
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
        let (fully, partially) = self.prepare_plot_data();
        let max_x = self.data.len().saturating_sub(1).max(1) as f64;
        let max_y = self.get_max_coverage();

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
        let label_style = (
            config.style.axis_font.family.as_str(),
            config.style.axis_font.size,
        )
            .into_font()
            .color(&text_color);

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(config.x_label.as_deref().unwrap_or("Date"))
            .y_desc(config.y_label.as_deref().unwrap_or("Coverage (%)"))
            .x_labels(10)
            .x_label_formatter(&x_formatter)
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
        let fully_color = colors.first().copied().unwrap_or(RGBColor(0, 212, 255));
        let partially_color = colors.get(1).copied().unwrap_or(RGBColor(0, 102, 204));

        chart
            .draw_series(LineSeries::new(
                fully.iter().copied(),
                fully_color.stroke_width(2),
            ))?
            .label("Fully Vaccinated")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], fully_color));

        chart
            .draw_series(LineSeries::new(
                partially.iter().copied(),
                partially_color.stroke_width(2),
            ))?
            .label("Partially Vaccinated")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], partially_color));

        let legend_font = (
            config.style.label_font.family.as_str(),
            config.style.label_font.size,
        )
            .into_font()
            .color(&text_color);
        chart
            .configure_series_labels()
            .border_style(self.get_grid_color(config))
            .label_font(legend_font)
            .draw()?;

        Ok(())
    }
}

impl Default for CoverageTrendChart {
    fn default() -> Self {
        Self::new()
    }
}
