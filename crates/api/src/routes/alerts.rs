//! Route definitions for payout alerts.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(alerts::list_alerts))
        .route("/alerts/{id}/resolve", post(alerts::resolve_alert))
}
