//! Vaccine type distribution bar chart

use crate::{ChartConfig, ChartRenderer};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use vaxtrack_common::{Result, VaxTrackError};
use vaxtrack_data::VaccineMixPoint;

// Bar thickness around each integer center.
const BAR_HALF_SPAN: f64 = 0.35;

/// Vertical bar chart of record counts per vaccine type
///
/// One bar per vaccine type, sorted descending by count, each labelled
/// with its record count. Bar colors cycle through the configured
/// palette.
#[derive(Debug)]
pub struct VaccineMixChart {
    /// Distribution points, descending by record count
    pub data: Vec<VaccineMixPoint>,
}

impl VaccineMixChart {
    /// Create an empty distribution chart
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Set chart data, re-sorted descending by record count
    pub fn set_data(&mut self, mut data: Vec<VaccineMixPoint>) {
        data.sort_by(|a, b| {
            b.record_count
                .cmp(&a.record_count)
                .then_with(|| a.vaccine_type.cmp(&b.vaccine_type))
        });
        self.data = data;
    }

    /// Get max record count for y-axis scaling
    fn get_max_count(&self) -> f64 {
        if self.data.is_empty() {
            return 10.0; // Default value for empty data
        }
        self.data
            .iter()
            .map(|p| p.record_count as f64)
            .fold(0.0, f64::max)
            * 1.1 // Add 10% padding
    }

    /// Vaccine name for an integer tick position, blank elsewhere
    fn vaccine_label(&self, x: f64) -> String {
        let idx = x.round();
        if idx < 0.0 || (x - idx).abs() > 0.25 {
            return String::new();
        }
        self.data
            .get(idx as usize)
            .map(|p| p.vaccine_type.name().to_string())
            .unwrap_or_default()
    }

    /// One color per bar, cycling through the scheme palette
    fn bar_colors(&self, config: &ChartConfig) -> Vec<RGBColor> {
        let mut palette = self.get_colors(&config.style.color_scheme);
        if palette.is_empty() {
            palette = self.get_colors(&crate::ColorScheme::Dashboard);
        }
        (0..self.data.len())
            .map(|i| palette[i % palette.len()])
            .collect()
    }
}

impl ChartRenderer for VaccineMixChart {
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
        let max_y = self.get_max_count();
        let max_x = self.data.len() as f64 - 0.5;

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
            .build_cartesian_2d(-0.5f64..max_x, 0f64..max_y)?;

        let x_formatter = |x: &f64| self.vaccine_label(*x);
        let label_style = (
            config.style.axis_font.family.as_str(),
            config.style.axis_font.size,
        )
            .into_font()
            .color(&text_color);

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(config.x_label.as_deref().unwrap_or("Vaccine Type"))
            .y_desc(config.y_label.as_deref().unwrap_or("Records"))
            .x_labels(self.data.len())
            .x_label_formatter(&x_formatter)
            .label_style(label_style)
            .axis_style(text_color)
            .light_line_style(self.get_grid_color(config).mix(0.4));

        // Bar charts only draw horizontal grid lines.
        if config.style.grid.show_y {
            mesh.disable_x_mesh().draw()?;
        } else {
            mesh.disable_mesh().draw()?;
        }

        let colors = self.bar_colors(config);
        chart.draw_series(self.data.iter().enumerate().map(|(i, point)| {
            let center = i as f64;
            Rectangle::new(
                [
                    (center - BAR_HALF_SPAN, 0.0),
                    (center + BAR_HALF_SPAN, point.record_count as f64),
                ],
                colors[i].filled(),
            )
        }))?;

        let value_style = (
            config.style.label_font.family.as_str(),
            config.style.label_font.size,
        )
            .into_font()
            .color(&text_color)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        let label_offset = max_y * 0.01;

        chart.draw_series(self.data.iter().enumerate().map(|(i, point)| {
            Text::new(
                point.record_count.to_string(),
                (i as f64, point.record_count as f64 + label_offset),
                value_style.clone(),
            )
        }))?;

        Ok(())
    }
}

impl Default for VaccineMixChart {
    fn default() -> Self {
        Self::new()
    }
}
