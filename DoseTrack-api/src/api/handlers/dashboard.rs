use std::sync::Arc;
use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};
use utoipa::{IntoParams, ToSchema};

use dose_track_domain::services::aggregation::ReportingWindow;
use dose_track_domain::services::dashboard::{DashboardServiceTrait, DashboardSummary};
use dose_track_domain::services::statistics::LevelStatistics;

use crate::entities::common::ErrorResponse;

/// Shared dashboard service handle injected by the router
pub type DashboardServiceHandle = Arc<dyn DashboardServiceTrait + Send + Sync>;

/// Query parameters for the dashboard
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DashboardQueryParams {
    /// Reporting window: week, month, quarter or year (default: week)
    pub window: Option<String>,
}

/// A single daily sample in a chart series
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SamplePoint {
    /// Sample date
    pub date: NaiveDate,

    /// Estimated active level in mg
    pub level: f64,
}

/// One chart series: either a single medication or a class aggregate
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeriesResponse {
    /// Series label (medication name, or e.g. "Total T" for aggregates)
    pub label: String,

    /// Whether this series is a class aggregate
    pub aggregate: bool,

    /// Daily samples over the reporting window
    pub points: Vec<SamplePoint>,
}

/// Dashboard response: windowed series plus summary statistics
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    /// The reporting window the response covers
    pub window: ReportingWindow,

    /// Individual medication series followed by the aggregate, if any
    pub series: Vec<SeriesResponse>,

    /// Statistics over the authoritative class series
    pub statistics: LevelStatistics,
}

/// Rounding is a presentation concern applied only here, at the API
/// boundary; the engine itself never rounds.
fn round_level(level: f64) -> f64 {
    (level * 100.0).round() / 100.0
}

fn to_response(summary: DashboardSummary) -> DashboardResponse {
    let mut series: Vec<SeriesResponse> = summary
        .series
        .by_medication
        .iter()
        .map(|(name, points)| SeriesResponse {
            label: name.clone(),
            aggregate: false,
            points: points
                .iter()
                .map(|(date, level)| SamplePoint { date: *date, level: round_level(*level) })
                .collect(),
        })
        .collect();

    if let Some(aggregate) = &summary.series.aggregate {
        series.push(SeriesResponse {
            label: aggregate.label.clone(),
            aggregate: true,
            points: aggregate
                .series
                .iter()
                .map(|(date, level)| SamplePoint { date: *date, level: round_level(*level) })
                .collect(),
        });
    }

    DashboardResponse {
        window: summary.window,
        series,
        statistics: LevelStatistics {
            max: round_level(summary.statistics.max),
            min: round_level(summary.statistics.min),
            average: round_level(summary.statistics.average),
        },
    }
}

/// Get the dashboard for a reporting window
#[utoipa::path(
    get,
    path = "/dashboard",
    params(DashboardQueryParams),
    responses(
        (status = 200, description = "Dashboard series and statistics", body = DashboardResponse),
        (status = 400, description = "Unknown reporting window", body = ErrorResponse)
    ),
    tag = "dashboard"
)]
#[instrument(skip(service))]
pub async fn get_dashboard(
    Extension(service): Extension<DashboardServiceHandle>,
    Query(params): Query<DashboardQueryParams>,
) -> Response {
    let window = match params.window.as_deref() {
        Some(raw) => match raw.parse::<ReportingWindow>() {
            Ok(window) => window,
            Err(message) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::bad_request(&message)),
                )
                    .into_response();
            }
        },
        None => ReportingWindow::Week,
    };

    match service.compute_dashboard(window, Utc::now()).await {
        Ok(summary) => (StatusCode::OK, Json(to_response(summary))).into_response(),
        Err(err) => {
            error!("Dashboard computation failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error()),
            )
                .into_response()
        }
    }
}
