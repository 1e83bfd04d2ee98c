//! Route definitions for the payout lifecycle.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payouts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/payouts",
            get(payouts::list_payouts).post(payouts::create_payout),
        )
        .route("/payouts/evaluate", post(payouts::evaluate_all))
        .route("/payouts/{id}", get(payouts::get_payout))
        .route("/payouts/{id}/confirm", post(payouts::confirm_payout))
        .route("/payouts/{id}/override", post(payouts::override_payout))
        .route("/payouts/{id}/received", post(payouts::mark_received))
        .route(
            "/payouts/{id}/observation",
            post(payouts::record_observation),
        )
        .route("/payouts/{id}/evaluate", post(payouts::evaluate_payout))
}
