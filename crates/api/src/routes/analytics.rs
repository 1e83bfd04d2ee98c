//! Route definitions for revenue analytics and reports.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analytics/summary", get(analytics::summary))
        .route(
            "/analytics/platform-breakdown",
            get(analytics::platform_breakdown),
        )
        .route("/analytics/monthly-trend", get(analytics::monthly_trend))
        .route(
            "/reports",
            get(analytics::list_reports).post(analytics::generate_report),
        )
        .route("/reports/{id}", get(analytics::get_report))
}
