pub mod alerts;
pub mod analytics;
pub mod health;
pub mod payouts;
pub mod rules;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /properties/{property_id}/rules              list rules
/// /properties/{property_id}/rules/{platform}   get active rule, upsert (PUT)
/// /rules/{id}                                  deactivate (DELETE)
///
/// /payouts                                     list, create
/// /payouts/evaluate                            bulk alert evaluation (POST)
/// /payouts/{id}                                get
/// /payouts/{id}/confirm                        confirm (POST)
/// /payouts/{id}/override                       manual override (POST)
/// /payouts/{id}/received                       mark received (POST)
/// /payouts/{id}/observation                    record observed fact (POST)
/// /payouts/{id}/evaluate                       re-evaluate alerts (POST)
///
/// /alerts                                      list
/// /alerts/{id}/resolve                         resolve (POST)
///
/// /analytics/summary                           revenue totals
/// /analytics/platform-breakdown                per-platform totals
/// /analytics/monthly-trend                     per-month totals
/// /reports                                     list, generate
/// /reports/{id}                                get
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(rules::router())
        .merge(payouts::router())
        .merge(alerts::router())
        .merge(analytics::router())
}
