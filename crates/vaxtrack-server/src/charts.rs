//! Server-rendered PNG chart handlers
//!
//! Each handler aggregates the filtered dataset for its view, renders the
//! chart in memory, and serves the PNG bytes. Chart construction rejects
//! empty datasets; a filter matching nothing yields a server error.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
};
use vaxtrack_data::{
    CountrySnapshotAggregator, CoverageForecaster, DailyCoverageAggregator, DailyDosesAggregator,
    DataAggregator, GeoAggregator, VaccineMixAggregator,
};
use vaxtrack_graphs::{
    ChartConfig, ChartRenderer, CountryComparisonChart, CoverageTrendChart,
    DailyVaccinationsChart, ForecastChart, VaccineMixChart, WorldMapChart,
};

use crate::api::{filtered_records, map_error, FilterQuery};
use crate::state::AppState;

/// Wrap rendered bytes in an `image/png` response
fn png_response(bytes: Vec<u8>) -> Result<Response, StatusCode> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .body(bytes.into())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Render the coverage trend lines
pub async fn get_trend_chart(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Response, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    let points = DailyCoverageAggregator::new()
        .aggregate(&records)
        .map_err(map_error)?;

    let mut chart = CoverageTrendChart::new();
    chart.set_data(points);

    let config = ChartConfig::from_settings(&state.config.charts, "Vaccination Trends Over Time");
    let bytes = chart.render_to_bytes(&config).await.map_err(map_error)?;
    png_response(bytes)
}

/// Render the per-country coverage comparison bars
pub async fn get_countries_chart(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Response, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    let snapshots = CountrySnapshotAggregator::new()
        .aggregate(&records)
        .map_err(map_error)?;

    let mut chart = CountryComparisonChart::new();
    chart.set_data(snapshots);

    let config = ChartConfig::from_settings(&state.config.charts, "Country Comparison");
    let bytes = chart.render_to_bytes(&config).await.map_err(map_error)?;
    png_response(bytes)
}

/// Render the daily vaccinations area chart
pub async fn get_daily_chart(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Response, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    let points = DailyDosesAggregator::new()
        .aggregate(&records)
        .map_err(map_error)?;

    let mut chart = DailyVaccinationsChart::new();
    chart.set_data(points);

    let config = ChartConfig::from_settings(&state.config.charts, "Daily Vaccination Rate");
    let bytes = chart.render_to_bytes(&config).await.map_err(map_error)?;
    png_response(bytes)
}

/// Render the vaccine distribution bars
pub async fn get_vaccine_mix_chart(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Response, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    let points = VaccineMixAggregator::new()
        .aggregate(&records)
        .map_err(map_error)?;

    let mut chart = VaccineMixChart::new();
    chart.set_data(points);

    let config = ChartConfig::from_settings(&state.config.charts, "Vaccine Distribution");
    let bytes = chart.render_to_bytes(&config).await.map_err(map_error)?;
    png_response(bytes)
}

/// Render the geographic coverage bubbles
pub async fn get_map_chart(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Response, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    let points = GeoAggregator::new()
        .aggregate(&records)
        .map_err(map_error)?;

    let mut chart = WorldMapChart::new();
    chart.set_data(points);

    let config = ChartConfig::from_settings(&state.config.charts, "Global Vaccination Map");
    let bytes = chart.render_to_bytes(&config).await.map_err(map_error)?;
    png_response(bytes)
}

/// Render the coverage forecast with its confidence band
pub async fn get_forecast_chart(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Response, StatusCode> {
    let params = query.resolve(&state.config.data).map_err(map_error)?;
    let dataset = state.provider.dataset().await.map_err(map_error)?;
    let records = params.apply(&dataset);

    let forecaster =
        CoverageForecaster::new(state.config.data.forecast_days, state.config.data.seed);
    let forecast = forecaster
        .forecast(&records, params.range.end)
        .map_err(map_error)?;

    let mut chart = ForecastChart::new();
    chart.set_forecast(forecast);

    let title = format!("{}-Day Coverage Forecast", state.config.data.forecast_days);
    let config = ChartConfig::from_settings(&state.config.charts, title);
    let bytes = chart.render_to_bytes(&config).await.map_err(map_error)?;
    png_response(bytes)
}
