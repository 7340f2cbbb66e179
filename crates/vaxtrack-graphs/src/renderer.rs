//! Chart rendering trait and shared drawing helpers

use crate::{ChartConfig, ColorScheme};
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;
use vaxtrack_common::{Result, VaxTrackError};

/// Trait for charts that render through plotters
///
/// Implementors provide [`ChartRenderer::draw`]; the file and byte renderers
/// are derived from it, so every chart renders identically to disk and to
/// in-memory PNG responses.
#[async_trait::async_trait]
pub trait ChartRenderer {
    /// Draw the chart onto a prepared drawing area
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, plotters::coord::Shift>,
        config: &ChartConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static;

    /// Render the chart to a PNG file
    ///
    /// The chart is rendered in memory first; nothing is written to disk
    /// when drawing fails.
    async fn render_to_file(&self, config: &ChartConfig, path: &Path) -> Result<()> {
        let bytes = self.render_to_bytes(config).await?;
        std::fs::write(path, &bytes)?;

        tracing::info!("Rendered '{}' chart to {}", config.title, path.display());
        Ok(())
    }

    /// Render the chart to an in-memory PNG buffer
    async fn render_to_bytes(&self, config: &ChartConfig) -> Result<Vec<u8>> {
        let width = config.width;
        let height = config.height;
        // Raw RGB, three bytes per pixel.
        let mut buffer = vec![0u8; (width as usize) * (height as usize) * 3];
        {
            let root =
                BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            self.draw(&root, config)?;
            root.present()?;
        }
        encode_png(buffer, width, height)
    }

    /// Fill the drawing area with the configured background color
    fn apply_background<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, plotters::coord::Shift>,
        config: &ChartConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let bg_color = self.get_background_color(config);
        root.fill(&bg_color)?;
        Ok(())
    }

    /// Get colors from color scheme
    fn get_colors(&self, scheme: &ColorScheme) -> Vec<RGBColor> {
        match scheme {
            ColorScheme::Dashboard => vec![
                RGBColor(0, 212, 255),   // Cyan
                RGBColor(0, 102, 204),   // Blue
                RGBColor(78, 205, 196),  // Teal
                RGBColor(255, 107, 107), // Coral
                RGBColor(255, 209, 102), // Amber
                RGBColor(155, 93, 229),  // Violet
                RGBColor(139, 148, 158), // Gray
            ],
            ColorScheme::Light => vec![
                RGBColor(31, 119, 180),  // Blue
                RGBColor(255, 127, 14),  // Orange
                RGBColor(44, 160, 44),   // Green
                RGBColor(214, 39, 40),   // Red
                RGBColor(148, 103, 189), // Purple
                RGBColor(140, 86, 75),   // Brown
                RGBColor(227, 119, 194), // Pink
                RGBColor(127, 127, 127), // Gray
            ],
            ColorScheme::Custom(colors) => colors
                .iter()
                .map(|color_str| self.parse_color(color_str))
                .collect(),
        }
    }

    /// Parse a color string (hex format) to RGBColor
    fn parse_color(&self, color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        // Default to black if parsing fails
        RGBColor(0, 0, 0)
    }

    /// Get background color from the chart style
    fn get_background_color(&self, config: &ChartConfig) -> RGBColor {
        config
            .style
            .background_color
            .as_ref()
            .map(|color| self.parse_color(color))
            .unwrap_or(RGBColor(255, 255, 255)) // Default white
    }

    /// Get title/axis text color from the chart style
    fn get_text_color(&self, config: &ChartConfig) -> RGBColor {
        config
            .style
            .text_color
            .as_ref()
            .map(|color| self.parse_color(color))
            .unwrap_or(RGBColor(0, 0, 0)) // Default black
    }

    /// Get grid line color from the chart style
    fn get_grid_color(&self, config: &ChartConfig) -> RGBColor {
        config
            .style
            .grid
            .color
            .as_ref()
            .map(|color| self.parse_color(color))
            .unwrap_or(RGBColor(210, 210, 210)) // Default light gray
    }
}

/// Encode a raw RGB framebuffer as PNG
pub(crate) fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = image::RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        VaxTrackError::chart("Rendered buffer size does not match chart dimensions")
    })?;

    let mut encoded = Cursor::new(Vec::new());
    image
        .write_to(&mut encoded, image::ImageOutputFormat::Png)
        .map_err(|e| VaxTrackError::chart_with_source("PNG encoding failed", e))?;
    Ok(encoded.into_inner())
}
