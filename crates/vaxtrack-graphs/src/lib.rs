//! # VaxTrack Graphs
//!
//! Chart rendering for the vaccination dashboard.
//!
//! Each chart owns its plot data and renders through plotters, either to a
//! PNG file on disk or to an in-memory PNG buffer for HTTP responses.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod renderer;
pub mod types;

pub mod country_comparison;
pub mod coverage_trend;
pub mod daily_vaccinations;
pub mod forecast_chart;
pub mod vaccine_mix;
pub mod world_map;

pub use country_comparison::CountryComparisonChart;
pub use coverage_trend::CoverageTrendChart;
pub use daily_vaccinations::DailyVaccinationsChart;
pub use forecast_chart::ForecastChart;
pub use renderer::ChartRenderer;
pub use types::*;
pub use vaccine_mix::VaccineMixChart;
pub use world_map::WorldMapChart;
