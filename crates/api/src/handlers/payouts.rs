//! Handlers for the booking payout lifecycle.
//!
//! Creation computes amounts from the active rule (or an explicit
//! rate); confirm, override, and received are compare-and-set
//! transitions; every mutation re-evaluates alerts for the affected
//! payout via the engine.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use staypay_core::error::CoreError;
use staypay_core::types::DbId;
use staypay_db::models::booking_payout::{
    CreateBookingPayout, OverridePayout, PayoutFilter, RecordObservation,
};
use staypay_db::repositories::BookingPayoutRepo;

use crate::engine::reconcile;
use crate::error::{AppError, AppResult};
use crate::middleware::tenant::TenantContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for actor-only transitions (confirm, received).
#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    pub actor: String,
}

/// POST /api/v1/payouts
///
/// Record a booking's payout: computes commission and net amounts and
/// creates the record in `pending` status.
pub async fn create_payout(
    tenant: TenantContext,
    State(state): State<AppState>,
    Json(input): Json<CreateBookingPayout>,
) -> AppResult<impl IntoResponse> {
    let thresholds = state.config.alert_thresholds();
    let (payout, alerts) =
        reconcile::create_payout(&state.pool, tenant.tenant_id, &input, &thresholds).await?;

    tracing::info!(
        tenant_id = tenant.tenant_id,
        payout_id = payout.id,
        reservation_code = %payout.reservation_code,
        platform = %payout.platform,
        net_payout = %payout.net_payout_amount,
        alerts = alerts.len(),
        "Booking payout created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: payout })))
}

/// GET /api/v1/payouts
///
/// List payouts with optional property/platform/status/date filters.
pub async fn list_payouts(
    tenant: TenantContext,
    State(state): State<AppState>,
    Query(filter): Query<PayoutFilter>,
) -> AppResult<impl IntoResponse> {
    let payouts = BookingPayoutRepo::list(&state.pool, tenant.tenant_id, &filter).await?;
    Ok(Json(DataResponse { data: payouts }))
}

/// GET /api/v1/payouts/{id}
pub async fn get_payout(
    tenant: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let payout = BookingPayoutRepo::find_by_id(&state.pool, tenant.tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BookingPayout",
            id,
        }))?;
    Ok(Json(DataResponse { data: payout }))
}

/// POST /api/v1/payouts/{id}/confirm
///
/// Assert the computed amounts are correct. Idempotent on an
/// already-confirmed payout; rejects a received one.
pub async fn confirm_payout(
    tenant: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ActorRequest>,
) -> AppResult<impl IntoResponse> {
    let thresholds = state.config.alert_thresholds();
    let payout =
        reconcile::confirm_payout(&state.pool, tenant.tenant_id, id, &input.actor, &thresholds)
            .await?;

    tracing::info!(
        tenant_id = tenant.tenant_id,
        payout_id = id,
        actor = %input.actor,
        "Payout confirmed"
    );

    Ok(Json(DataResponse { data: payout }))
}

/// POST /api/v1/payouts/{id}/override
///
/// Replace the computed amounts with operator-supplied figures. The
/// additive identity is validated before anything persists; the payout
/// moves to `confirmed` with `manual_override` set.
pub async fn override_payout(
    tenant: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<OverridePayout>,
) -> AppResult<impl IntoResponse> {
    let thresholds = state.config.alert_thresholds();
    let payout =
        reconcile::override_payout(&state.pool, tenant.tenant_id, id, &input, &thresholds).await?;

    tracing::info!(
        tenant_id = tenant.tenant_id,
        payout_id = id,
        actor = %input.actor,
        net_payout = %payout.net_payout_amount,
        "Payout manually overridden"
    );

    Ok(Json(DataResponse { data: payout }))
}

/// POST /api/v1/payouts/{id}/received
///
/// Verify the funds as deposited. Requires `confirmed`; idempotent on
/// an already-received payout.
pub async fn mark_received(
    tenant: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ActorRequest>,
) -> AppResult<impl IntoResponse> {
    let thresholds = state.config.alert_thresholds();
    let payout =
        reconcile::mark_received(&state.pool, tenant.tenant_id, id, &input.actor, &thresholds)
            .await?;

    tracing::info!(
        tenant_id = tenant.tenant_id,
        payout_id = id,
        actor = %input.actor,
        "Payout marked received"
    );

    Ok(Json(DataResponse { data: payout }))
}

/// POST /api/v1/payouts/{id}/observation
///
/// Record a platform-sync or parsed-email payout observation. Alerting
/// input only; computed amounts are never overwritten.
pub async fn record_observation(
    tenant: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RecordObservation>,
) -> AppResult<impl IntoResponse> {
    let thresholds = state.config.alert_thresholds();
    let (payout, alerts) =
        reconcile::record_observation(&state.pool, tenant.tenant_id, id, &input, &thresholds)
            .await?;

    tracing::info!(
        tenant_id = tenant.tenant_id,
        payout_id = id,
        source = %input.source,
        alerts = alerts.len(),
        "Payout observation recorded"
    );

    Ok(Json(DataResponse { data: payout }))
}

/// POST /api/v1/payouts/{id}/evaluate
///
/// Re-run alert evaluation for one payout and return the alerts now on
/// file for it.
pub async fn evaluate_payout(
    tenant: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let thresholds = state.config.alert_thresholds();
    let (_, alerts) =
        reconcile::evaluate_payout(&state.pool, tenant.tenant_id, id, &thresholds).await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// POST /api/v1/payouts/evaluate
///
/// Re-run alert evaluation across the tenant's alert-relevant payouts.
/// External schedulers call this periodically; the engine has no
/// scheduler of its own.
pub async fn evaluate_all(
    tenant: TenantContext,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let thresholds = state.config.alert_thresholds();
    let outcome = reconcile::evaluate_all(&state.pool, tenant.tenant_id, &thresholds).await?;

    tracing::info!(
        tenant_id = tenant.tenant_id,
        evaluated = outcome.evaluated,
        alerts = outcome.alerts,
        "Bulk alert evaluation completed"
    );

    Ok(Json(DataResponse { data: outcome }))
}
