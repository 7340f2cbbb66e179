//! Coverage forecast chart with confidence band

use crate::{ChartConfig, ChartRenderer};
use plotters::prelude::*;
use vaxtrack_common::{Result, VaxTrackError};
use vaxtrack_data::CoverageForecast;

/// Line chart of projected coverage with a shaded confidence band
///
/// The y axis is framed around the forecast baseline the same way the
/// dashboard frames it: ten points below, fifteen above, clamped to the
/// valid percentage range.
#[derive(Debug)]
pub struct ForecastChart {
    /// Forecast to plot
    pub forecast: Option<CoverageForecast>,
}

impl ForecastChart {
    /// Create an empty forecast chart
    pub fn new() -> Self {
        Self { forecast: None }
    }

    /// Set the forecast to plot
    pub fn set_forecast(&mut self, forecast: CoverageForecast) {
        self.forecast = Some(forecast);
    }

    /// Y-axis bounds framed around the baseline coverage
    fn y_bounds(baseline_pct: f64) -> (f64, f64) {
        ((baseline_pct - 10.0).max(0.0), (baseline_pct + 15.0).min(100.0))
    }

    /// Axis label for an index position, blank between forecast points
    fn date_label(&self, x: f64) -> String {
        let Some(forecast) = &self.forecast else {
            return String::new();
        };
        let idx = x.round();
        if idx < 0.0 || (x - idx).abs() > 0.25 {
            return String::new();
        }
        forecast
            .points
            .get(idx as usize)
            .map(|p| p.date.format("%b %d").to_string())
            .unwrap_or_default()
    }
}

impl ChartRenderer for ForecastChart {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, plotters::coord::Shift>,
        config: &ChartConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let Some(forecast) = &self.forecast else {
            return Err(VaxTrackError::chart("No data to render"));
        };
        if forecast.points.is_empty() {
            return Err(VaxTrackError::chart("No data to render"));
        }
        self.apply_background(root, config)?;

        let text_color = self.get_text_color(config);
        let (min_y, max_y) = Self::y_bounds(forecast.baseline_pct);
        let max_x = forecast.points.len().saturating_sub(1).max(1) as f64;

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
            .build_cartesian_2d(0f64..max_x, min_y..max_y)?;

        let x_formatter = |x: &f64| self.date_label(*x);
        let label_style = (
            config.style.axis_font.family.as_str(),
            config.style.axis_font.size,
        )
            .into_font()
            .color(&text_color);

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(config.x_label.as_deref().unwrap_or("Date"))
            .y_desc(config.y_label.as_deref().unwrap_or("Projected Coverage (%)"))
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
        let line_color = colors.first().copied().unwrap_or(RGBColor(0, 212, 255));
        let band_color = colors.get(1).copied().unwrap_or(RGBColor(0, 102, 204));

        // Upper bound left to right, then lower bound back, closing the band.
        let band: Vec<(f64, f64)> = forecast
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.upper_bound_pct))
            .chain(
                forecast
                    .points
                    .iter()
                    .enumerate()
                    .rev()
                    .map(|(i, p)| (i as f64, p.lower_bound_pct)),
            )
            .collect();

        chart
            .draw_series(std::iter::once(Polygon::new(band, band_color.mix(0.2))))?
            .label("Confidence Band")
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 4), (x + 10, y + 4)], band_color.mix(0.2).filled())
            });

        let predicted: Vec<(f64, f64)> = forecast
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.predicted_pct))
            .collect();

        chart
            .draw_series(LineSeries::new(
                predicted.iter().copied(),
                line_color.stroke_width(2),
            ))?
            .label("Predicted Coverage")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], line_color));

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

impl Default for ForecastChart {
    fn default() -> Self {
        Self::new()
    }
}
