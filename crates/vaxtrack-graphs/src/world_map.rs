//! Geographic coverage bubble chart

use crate::{ChartConfig, ChartRenderer};
use plotters::prelude::*;
use vaxtrack_common::{Result, VaxTrackError};
use vaxtrack_data::GeoPoint;

// Bubble radius bounds in pixels.
const MIN_BUBBLE_RADIUS: i32 = 4;
const MAX_BUBBLE_RADIUS: i32 = 22;

/// World bubble chart of the latest coverage per country
///
/// Bubble position is the country centroid, bubble size scales with total
/// doses administered and opacity tracks the fully vaccinated share.
#[derive(Debug)]
pub struct WorldMapChart {
    /// Latest geographic snapshot per country
    pub data: Vec<GeoPoint>,
}

impl WorldMapChart {
    /// Create an empty world map chart
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Set chart data from the geographic aggregation
    pub fn set_data(&mut self, data: Vec<GeoPoint>) {
        self.data = data;
    }

    /// Scale a dose count into a bubble radius
    fn bubble_radius(doses: u64, max_doses: u64) -> i32 {
        if max_doses == 0 {
            return MIN_BUBBLE_RADIUS;
        }
        let span = f64::from(MAX_BUBBLE_RADIUS - MIN_BUBBLE_RADIUS);
        MIN_BUBBLE_RADIUS + (doses as f64 / max_doses as f64 * span).round() as i32
    }

    /// Map a coverage share onto bubble opacity
    fn coverage_alpha(pct: f64) -> f64 {
        0.3 + 0.6 * (pct.clamp(0.0, 100.0) / 100.0)
    }
}

impl ChartRenderer for WorldMapChart {
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
            .build_cartesian_2d(-180f64..180f64, -90f64..90f64)?;

        let label_style = (
            config.style.axis_font.family.as_str(),
            config.style.axis_font.size,
        )
            .into_font()
            .color(&text_color);

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(config.x_label.as_deref().unwrap_or("Longitude"))
            .y_desc(config.y_label.as_deref().unwrap_or("Latitude"))
            .x_labels(9)
            .y_labels(7)
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
        let max_doses = self
            .data
            .iter()
            .map(|p| p.doses_administered)
            .max()
            .unwrap_or(0);

        chart.draw_series(self.data.iter().map(|point| {
            let radius = Self::bubble_radius(point.doses_administered, max_doses);
            let alpha = Self::coverage_alpha(point.fully_vaccinated_pct);
            Circle::new(
                (point.longitude, point.latitude),
                radius,
                primary_color.mix(alpha).filled(),
            )
        }))?;

        let country_style = (
            config.style.label_font.family.as_str(),
            config.style.label_font.size,
        )
            .into_font()
            .color(&text_color);
        chart.draw_series(self.data.iter().map(|point| {
            Text::new(
                point.country.name(),
                (point.longitude, point.latitude + 4.0),
                country_style.clone(),
            )
        }))?;

        Ok(())
    }
}

impl Default for WorldMapChart {
    fn default() -> Self {
        Self::new()
    }
}
