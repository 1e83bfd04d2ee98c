//! Handlers for payout rule management.
//!
//! Rules are keyed by (property, platform) and soft-deactivated rather
//! than deleted, so payouts computed under an old rule keep their
//! context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use staypay_core::error::CoreError;
use staypay_core::payout::validate_commission_rate;
use staypay_core::platform::normalize_platform;
use staypay_core::types::DbId;
use staypay_db::models::payout_rule::UpsertPayoutRule;
use staypay_db::repositories::PayoutRuleRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::tenant::TenantContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/properties/{property_id}/rules
///
/// List the rules on file for a property. Includes deactivated rules
/// for audit purposes.
pub async fn list_rules(
    tenant: TenantContext,
    State(state): State<AppState>,
    Path(property_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let rules = PayoutRuleRepo::list(&state.pool, tenant.tenant_id, Some(property_id)).await?;
    Ok(Json(DataResponse { data: rules }))
}

/// GET /api/v1/properties/{property_id}/rules/{platform}
///
/// Return the single active rule for the key, or 404 if none is on file.
pub async fn get_rule(
    tenant: TenantContext,
    State(state): State<AppState>,
    Path((property_id, platform)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let platform = normalize_platform(&platform).map_err(CoreError::Validation)?;
    let rule = PayoutRuleRepo::find_active(&state.pool, tenant.tenant_id, property_id, &platform)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PayoutRule",
            id: property_id,
        }))?;
    Ok(Json(DataResponse { data: rule }))
}

/// PUT /api/v1/properties/{property_id}/rules/{platform}
///
/// Create or replace the active rule for the key. Any prior active rule
/// is deactivated in the same transaction.
pub async fn upsert_rule(
    tenant: TenantContext,
    State(state): State<AppState>,
    Path((property_id, platform)): Path<(DbId, String)>,
    Json(input): Json<UpsertPayoutRule>,
) -> AppResult<impl IntoResponse> {
    let platform = normalize_platform(&platform).map_err(CoreError::Validation)?;
    validate_commission_rate(input.commission_rate)?;

    let rule = PayoutRuleRepo::upsert(
        &state.pool,
        tenant.tenant_id,
        property_id,
        &platform,
        &input,
    )
    .await?;

    tracing::info!(
        tenant_id = tenant.tenant_id,
        property_id,
        platform = %rule.platform,
        commission_rate = %rule.commission_rate,
        "Payout rule upserted"
    );

    Ok(Json(DataResponse { data: rule }))
}

/// DELETE /api/v1/rules/{id}
///
/// Deactivate a rule. Existing payouts keep their already-computed
/// values; idempotent on an already-inactive rule.
pub async fn deactivate_rule(
    tenant: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    PayoutRuleRepo::find_by_id(&state.pool, tenant.tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PayoutRule",
            id,
        }))?;

    let deactivated = PayoutRuleRepo::deactivate(&state.pool, tenant.tenant_id, id).await?;
    if deactivated {
        tracing::info!(tenant_id = tenant.tenant_id, rule_id = id, "Payout rule deactivated");
    }

    Ok(StatusCode::NO_CONTENT)
}
