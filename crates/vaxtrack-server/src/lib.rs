//! # VaxTrack Server
//!
//! HTTP surface of the VaxTrack dashboard: JSON data endpoints, CSV export,
//! and server-rendered PNG charts, all serving views of one shared cached
//! dataset.

pub mod api;
pub mod charts;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use vaxtrack_config::Config;

pub use state::AppState;

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(api::get_health))
        // Dashboard data endpoints
        .route("/api/summary", get(api::get_summary))
        .route("/api/trend", get(api::get_coverage_trend))
        .route("/api/countries", get(api::get_country_snapshots))
        .route("/api/daily", get(api::get_daily_vaccinations))
        .route("/api/vaccine-mix", get(api::get_vaccine_mix))
        .route("/api/weekly", get(api::get_weekly_coverage))
        .route("/api/change", get(api::get_daily_change))
        .route("/api/forecast", get(api::get_forecast))
        .route("/api/map", get(api::get_map_points))
        // Raw data and statistics endpoints
        .route("/api/records", get(api::get_records))
        .route("/api/stats", get(api::get_statistics))
        .route("/api/export.csv", get(api::export_csv))
        .route("/api/refresh", post(api::refresh_dataset))
        // Rendered chart endpoints
        .route("/charts/trend.png", get(charts::get_trend_chart))
        .route("/charts/countries.png", get(charts::get_countries_chart))
        .route("/charts/daily.png", get(charts::get_daily_chart))
        .route("/charts/vaccine-mix.png", get(charts::get_vaccine_mix_chart))
        .route("/charts/map.png", get(charts::get_map_chart))
        .route("/charts/forecast.png", get(charts::get_forecast_chart))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Start the API server and run until shutdown
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let bind_address = config.server.bind_address.clone();
    let state = AppState::new(config)?;
    let app = create_router(state);

    info!("Starting VaxTrack API server on {}", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("VaxTrack API server listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("VaxTrack API server stopped");

    Ok(())
}

/// Resolve when the process receives Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_builds_with_default_state() {
        let state = AppState::new(Config::default()).expect("Failed to build state");
        let _router = create_router(state);
    }
}
