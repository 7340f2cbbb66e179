//! JSON API handlers for the dashboard
//!
//! Every data endpoint accepts the same filter query (`start`, `end`,
//! `countries`) and falls back to the configured defaults for whatever the
//! request leaves out. Empty selections are not an error; aggregation
//! endpoints return empty or NaN-bearing bodies, with NaN serialized as
//! JSON `null`.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Json, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use vaxtrack_common::{CountrySelection, DateRange, VaccinationRecord, VaxTrackError};
use vaxtrack_config::DataConfig;
use vaxtrack_data::{
    CountrySnapshot, CountrySnapshotAggregator, CoverageForecast, CoverageForecaster,
    CoveragePoint, CsvExporter, DailyChangeAggregator, DailyChangePoint, DailyCoverageAggregator,
    DailyDosesAggregator, DailyDosesPoint, DataAggregator, DatasetStatistics, FilterParams,
    GeoAggregator, GeoPoint, HeadlineSummary, VaccineMixAggregator, VaccineMixPoint,
    WeeklyCoverageAggregator, WeeklyCoveragePoint,
};

use crate::state::AppState;

/// Filter parameters accepted by every data endpoint
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    /// Inclusive range start (ISO date)
    pub start: Option<NaiveDate>,
    /// Inclusive range end (ISO date)
    pub end: Option<NaiveDate>,
    /// Comma-separated country names; "all" disables the country filter
    pub countries: Option<String>,
}

impl FilterQuery {
    /// Resolve the query against the configured defaults
    pub fn resolve(&self, config: &DataConfig) -> vaxtrack_common::Result<FilterParams> {
        let today = Utc::now().date_naive();
        let range = match (self.start, self.end) {
            (Some(start), Some(end)) => DateRange::new(start, end)?,
            (Some(start), None) => DateRange::new(start, today)?,
            (None, Some(end)) => DateRange::trailing(end, config.default_range_days),
            (None, None) => DateRange::trailing(today, config.default_range_days),
        };

        let selection = match &self.countries {
            Some(raw) => {
                let names: Vec<&str> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect();
                CountrySelection::from_names(&names)?
            }
            None => CountrySelection::from_names(&config.default_countries)?,
        };

        Ok(FilterParams::new(range, selection))
    }
}

/// Query parameters for the raw records endpoint
#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    /// Maximum number of rows to return
    pub limit: Option<usize>,
}

/// Service health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,
    /// Active dataset source
    pub source: String,
    /// Dataset cache counters
    pub cache: HashMap<String, u64>,
    /// When the dataset was last loaded
    pub last_refresh: Option<DateTime<Utc>>,
}

/// Cache refresh response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// Number of records loaded into the cache
    pub record_count: usize,
    /// When the reload happened
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Map a domain error onto a response status
pub(crate) fn map_error(err: VaxTrackError) -> StatusCode {
    match err {
        VaxTrackError::Validation { .. } => {
            warn!("Rejected request: {}", err);
            StatusCode::BAD_REQUEST
        }
        _ => {
            error!("Request failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Load the cached dataset and apply the request filter
pub(crate) async fn filtered_records(
    state: &AppState,
    query: &FilterQuery,
) -> Result<Vec<VaccinationRecord>, StatusCode> {
    let params = query.resolve(&state.config.data).map_err(map_error)?;
    let dataset = state.provider.dataset().await.map_err(map_error)?;
    Ok(params.apply(&dataset))
}

/// Get service health, dataset source and cache counters
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let last_refresh = state.provider.last_refresh().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        source: state.config.data.source.to_string(),
        cache: state.provider.cache_stats(),
        last_refresh,
    })
}

/// Get headline metrics for the overview cards
pub async fn get_summary(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<HeadlineSummary>, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    Ok(Json(state.stats.headline_summary(&records)))
}

/// Get the daily mean coverage series
pub async fn get_coverage_trend(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CoveragePoint>>, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    let points = DailyCoverageAggregator::new()
        .aggregate(&records)
        .map_err(map_error)?;
    Ok(Json(points))
}

/// Get the latest snapshot per country
pub async fn get_country_snapshots(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CountrySnapshot>>, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    let snapshots = CountrySnapshotAggregator::new()
        .aggregate(&records)
        .map_err(map_error)?;
    Ok(Json(snapshots))
}

/// Get summed daily vaccinations by date
pub async fn get_daily_vaccinations(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyDosesPoint>>, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    let points = DailyDosesAggregator::new()
        .aggregate(&records)
        .map_err(map_error)?;
    Ok(Json(points))
}

/// Get record counts per vaccine type
pub async fn get_vaccine_mix(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<VaccineMixPoint>>, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    let points = VaccineMixAggregator::new()
        .aggregate(&records)
        .map_err(map_error)?;
    Ok(Json(points))
}

/// Get weekly coverage progression per country
pub async fn get_weekly_coverage(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<WeeklyCoveragePoint>>, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    let points = WeeklyCoverageAggregator::new()
        .aggregate(&records)
        .map_err(map_error)?;
    Ok(Json(points))
}

/// Get per-country day-over-day coverage change
pub async fn get_daily_change(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyChangePoint>>, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    let points = DailyChangeAggregator::new()
        .aggregate(&records)
        .map_err(map_error)?;
    Ok(Json(points))
}

/// Get the coverage projection with confidence bounds
pub async fn get_forecast(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<CoverageForecast>, StatusCode> {
    let params = query.resolve(&state.config.data).map_err(map_error)?;
    let dataset = state.provider.dataset().await.map_err(map_error)?;
    let records = params.apply(&dataset);

    let forecaster =
        CoverageForecaster::new(state.config.data.forecast_days, state.config.data.seed);
    let forecast = forecaster
        .forecast(&records, params.range.end)
        .map_err(map_error)?;
    Ok(Json(forecast))
}

/// Get one geographic bubble per country
pub async fn get_map_points(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<GeoPoint>>, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    let points = GeoAggregator::new()
        .aggregate(&records)
        .map_err(map_error)?;
    Ok(Json(points))
}

/// Get the first rows of the filtered dataset
pub async fn get_records(
    Query(query): Query<FilterQuery>,
    Query(records_query): Query<RecordsQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<VaccinationRecord>>, StatusCode> {
    let mut records = filtered_records(&state, &query).await?;
    let limit = records_query
        .limit
        .unwrap_or(state.config.data.record_limit);
    records.truncate(limit);
    Ok(Json(records))
}

/// Get per-field statistics over the filtered dataset
pub async fn get_statistics(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<DatasetStatistics>, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    Ok(Json(state.stats.dataset_statistics(&records)))
}

/// Download the filtered dataset as a CSV attachment
pub async fn export_csv(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Response, StatusCode> {
    let records = filtered_records(&state, &query).await?;
    let body = CsvExporter::to_csv(&records).map_err(map_error)?;
    let filename = CsvExporter::export_filename(Utc::now().date_naive());

    info!(rows = records.len(), filename = %filename, "Serving CSV export");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(body.into())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Drop the cached dataset and reload it
pub async fn refresh_dataset(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, StatusCode> {
    let record_count = state.provider.refresh().await.map_err(map_error)?;
    let refreshed_at = state.provider.last_refresh().await;

    info!(record_count, "Dataset cache refreshed");

    Ok(Json(RefreshResponse {
        record_count,
        refreshed_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaxtrack_config::{Config, SourceKind};

    fn test_state() -> AppState {
        let mut config = Config::default();
        config.data.source = SourceKind::Sample;
        config.data.seed = Some(42);
        config.data.window_days = 40;
        AppState::new(config).expect("Failed to build test state")
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("invalid test date")
    }

    fn past_query() -> FilterQuery {
        FilterQuery {
            start: Some(date("2000-01-01")),
            end: Some(date("2000-02-01")),
            countries: Some("all".to_string()),
        }
    }

    #[test]
    fn test_resolve_defaults_to_configured_window() {
        let config = Config::default();
        let params = FilterQuery::default()
            .resolve(&config.data)
            .expect("resolve failed");

        assert_eq!(params.range.end, Utc::now().date_naive());
        assert_eq!(
            params.range.num_days(),
            i64::from(config.data.default_range_days) + 1
        );
        assert!(!params.countries.is_unrestricted());
    }

    #[test]
    fn test_resolve_all_sentinel_lifts_country_filter() {
        let config = Config::default();
        let query = FilterQuery {
            countries: Some("all".to_string()),
            ..FilterQuery::default()
        };

        let params = query.resolve(&config.data).expect("resolve failed");
        assert!(params.countries.is_unrestricted());
    }

    #[test]
    fn test_resolve_splits_country_list() {
        use vaxtrack_common::Country;

        let config = Config::default();
        let query = FilterQuery {
            countries: Some("USA, India".to_string()),
            ..FilterQuery::default()
        };

        let params = query.resolve(&config.data).expect("resolve failed");
        assert!(params.countries.matches(Country::Usa));
        assert!(params.countries.matches(Country::India));
        assert!(!params.countries.matches(Country::Brazil));
    }

    #[test]
    fn test_resolve_end_only_anchors_window_at_end() {
        let config = Config::default();
        let query = FilterQuery {
            end: Some(date("2024-06-30")),
            ..FilterQuery::default()
        };

        let params = query.resolve(&config.data).expect("resolve failed");
        assert_eq!(params.range.end, date("2024-06-30"));
        assert_eq!(
            params.range.num_days(),
            i64::from(config.data.default_range_days) + 1
        );
    }

    #[test]
    fn test_resolve_rejects_reversed_range() {
        let config = Config::default();
        let query = FilterQuery {
            start: Some(date("2024-06-10")),
            end: Some(date("2024-06-01")),
            ..FilterQuery::default()
        };

        let err = query.resolve(&config.data).unwrap_err();
        assert_eq!(map_error(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_resolve_rejects_unknown_country() {
        let config = Config::default();
        let query = FilterQuery {
            countries: Some("Atlantis".to_string()),
            ..FilterQuery::default()
        };

        let err = query.resolve(&config.data).unwrap_err();
        assert_eq!(map_error(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_map_error_statuses() {
        assert_eq!(
            map_error(VaxTrackError::validation("bad input")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            map_error(VaxTrackError::chart("no data")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            map_error(VaxTrackError::new("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_health_reports_source_and_cache() {
        let state = test_state();
        let Json(health) = get_health(State(state)).await;

        assert_eq!(health.status, "ok");
        assert_eq!(health.source, "sample");
        assert!(health.last_refresh.is_none());
    }

    #[tokio::test]
    async fn test_summary_over_sample_dataset() {
        let state = test_state();
        let Json(summary) = get_summary(Query(FilterQuery::default()), State(state))
            .await
            .expect("summary failed");

        assert!(summary.record_count > 0);
        assert_eq!(summary.country_count, 4);
        assert!(summary.average_fully_vaccinated_pct > 0.0);
        assert!(summary.average_fully_vaccinated_pct <= 100.0);
    }

    #[tokio::test]
    async fn test_summary_empty_selection_is_ok() {
        let state = test_state();
        let Json(summary) = get_summary(Query(past_query()), State(state))
            .await
            .expect("summary failed");

        assert_eq!(summary.record_count, 0);
        assert!(summary.average_fully_vaccinated_pct.is_nan());
        assert_eq!(summary.latest_date, None);
    }

    #[tokio::test]
    async fn test_trend_points_sorted_by_date() {
        let state = test_state();
        let Json(points) = get_coverage_trend(Query(FilterQuery::default()), State(state))
            .await
            .expect("trend failed");

        assert!(!points.is_empty());
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[tokio::test]
    async fn test_vaccine_mix_shares_sum_to_one_hundred() {
        let state = test_state();
        let Json(points) = get_vaccine_mix(Query(FilterQuery::default()), State(state))
            .await
            .expect("vaccine mix failed");

        let total: f64 = points.iter().map(|p| p.share_pct).sum();
        assert!((total - 100.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_records_respects_limit_parameter() {
        let state = test_state();
        let Json(records) = get_records(
            Query(FilterQuery::default()),
            Query(RecordsQuery { limit: Some(5) }),
            State(state),
        )
        .await
        .expect("records failed");

        assert_eq!(records.len(), 5);
    }

    #[tokio::test]
    async fn test_records_fall_back_to_configured_limit() {
        let mut config = Config::default();
        config.data.seed = Some(42);
        config.data.window_days = 40;
        config.data.record_limit = 10;
        let state = AppState::new(config).expect("Failed to build test state");

        let Json(records) = get_records(
            Query(FilterQuery::default()),
            Query(RecordsQuery::default()),
            State(state),
        )
        .await
        .expect("records failed");

        assert_eq!(records.len(), 10);
    }

    #[tokio::test]
    async fn test_forecast_runs_over_sample_dataset() {
        let state = test_state();
        let Json(forecast) = get_forecast(Query(FilterQuery::default()), State(state.clone()))
            .await
            .expect("forecast failed");

        assert_eq!(
            forecast.points.len(),
            state.config.data.forecast_days as usize
        );
    }

    #[tokio::test]
    async fn test_forecast_empty_selection_is_bad_request() {
        let state = test_state();
        let err = get_forecast(Query(past_query()), State(state))
            .await
            .unwrap_err();

        assert_eq!(err, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_csv_sets_attachment_headers() {
        let state = test_state();
        let response = export_csv(Query(FilterQuery::default()), State(state))
            .await
            .expect("export failed");

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert_eq!(content_type, "text/csv; charset=utf-8");

        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(disposition.starts_with("attachment; filename=\"vaccination_data_"));
        assert!(disposition.ends_with(".csv\""));
    }

    #[tokio::test]
    async fn test_refresh_reloads_dataset() {
        let state = test_state();
        let Json(refresh) = refresh_dataset(State(state.clone()))
            .await
            .expect("refresh failed");

        assert!(refresh.record_count > 0);
        assert!(refresh.refreshed_at.is_some());

        let Json(health) = get_health(State(state)).await;
        assert!(health.last_refresh.is_some());
    }
}
