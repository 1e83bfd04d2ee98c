//! Route definitions for payout rule management.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::rules;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/properties/{property_id}/rules", get(rules::list_rules))
        .route(
            "/properties/{property_id}/rules/{platform}",
            get(rules::get_rule).put(rules::upsert_rule),
        )
        .route("/rules/{id}", delete(rules::deactivate_rule))
}
