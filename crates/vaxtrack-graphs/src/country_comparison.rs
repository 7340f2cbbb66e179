//! Country coverage comparison bar chart

use crate::{ChartConfig, ChartRenderer};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use vaxtrack_common::{Result, VaxTrackError};
use vaxtrack_data::CountrySnapshot;

// Bar thickness around each integer center.
const BAR_HALF_SPAN: f64 = 0.38;

/// Horizontal bar chart of the latest fully vaccinated share per country
///
/// Bars are sorted ascending, so the leading country sits at the top of
/// the chart. Every bar carries its percentage as a text label past the
/// bar end.
#[derive(Debug)]
pub struct CountryComparisonChart {
    /// Latest snapshot per country, ascending by fully vaccinated share
    pub data: Vec<CountrySnapshot>,
}

impl CountryComparisonChart {
    /// Create an empty comparison chart
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Set chart data, re-sorted ascending by fully vaccinated share
    pub fn set_data(&mut self, mut data: Vec<CountrySnapshot>) {
        data.sort_by(|a, b| {
            a.fully_vaccinated_pct
                .total_cmp(&b.fully_vaccinated_pct)
                .then_with(|| a.country.cmp(&b.country))
        });
        self.data = data;
    }

    /// Get max coverage for value-axis scaling
    fn get_max_value(&self) -> f64 {
        if self.data.is_empty() {
            return 10.0; // Default value for empty data
        }
        self.data
            .iter()
            .map(|s| s.fully_vaccinated_pct)
            .fold(0.0, f64::max)
            * 1.1 // Add 10% padding
    }

    /// Country name for an integer tick position, blank elsewhere
    fn country_label(&self, y: f64) -> String {
        let idx = y.round();
        if idx < 0.0 || (y - idx).abs() > 0.25 {
            return String::new();
        }
        self.data
            .get(idx as usize)
            .map(|s| s.country.name().to_string())
            .unwrap_or_default()
    }
}

impl ChartRenderer for CountryComparisonChart {
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
        let max_x = self.get_max_value();
        let max_y = self.data.len() as f64 - 0.5;

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
            .build_cartesian_2d(0f64..max_x, -0.5f64..max_y)?;

        let y_formatter = |y: &f64| self.country_label(*y);
        let label_style = (
            config.style.axis_font.family.as_str(),
            config.style.axis_font.size,
        )
            .into_font()
            .color(&text_color);

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(config.x_label.as_deref().unwrap_or("Fully Vaccinated (%)"))
            .y_desc(config.y_label.as_deref().unwrap_or("Country"))
            .y_labels(self.data.len())
            .y_label_formatter(&y_formatter)
            .label_style(label_style)
            .axis_style(text_color)
            .light_line_style(self.get_grid_color(config).mix(0.4));

        // Horizontal bars only draw vertical grid lines.
        if config.style.grid.show_x {
            mesh.disable_y_mesh().draw()?;
        } else {
            mesh.disable_mesh().draw()?;
        }

        let colors = self.get_colors(&config.style.color_scheme);
        let bar_color = colors.first().copied().unwrap_or(RGBColor(0, 212, 255));

        chart.draw_series(self.data.iter().enumerate().map(|(i, snapshot)| {
            let center = i as f64;
            Rectangle::new(
                [
                    (0.0, center - BAR_HALF_SPAN),
                    (snapshot.fully_vaccinated_pct, center + BAR_HALF_SPAN),
                ],
                bar_color.filled(),
            )
        }))?;

        let value_style = (
            config.style.label_font.family.as_str(),
            config.style.label_font.size,
        )
            .into_font()
            .color(&text_color)
            .pos(Pos::new(HPos::Left, VPos::Center));
        let label_offset = max_x * 0.01;

        chart.draw_series(self.data.iter().enumerate().map(|(i, snapshot)| {
            Text::new(
                format!("{:.1}%", snapshot.fully_vaccinated_pct),
                (snapshot.fully_vaccinated_pct + label_offset, i as f64),
                value_style.clone(),
            )
        }))?;

        Ok(())
    }
}

impl Default for CountryComparisonChart {
    fn default() -> Self {
        Self::new()
    }
}
