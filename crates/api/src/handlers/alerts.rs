//! Handlers for payout alert listing and resolution.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use staypay_core::error::CoreError;
use staypay_core::types::DbId;
use staypay_db::models::payout_alert::{AlertFilter, ResolveAlert};
use staypay_db::repositories::PayoutAlertRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::tenant::TenantContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/alerts
///
/// List alerts with optional type/severity/resolved/payout filters.
pub async fn list_alerts(
    tenant: TenantContext,
    State(state): State<AppState>,
    Query(filter): Query<AlertFilter>,
) -> AppResult<impl IntoResponse> {
    let alerts = PayoutAlertRepo::list(&state.pool, tenant.tenant_id, &filter).await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// POST /api/v1/alerts/{id}/resolve
///
/// Resolve an alert. Terminal: resolution never reopens, and resolving
/// an already-resolved alert returns it unchanged.
pub async fn resolve_alert(
    tenant: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ResolveAlert>,
) -> AppResult<impl IntoResponse> {
    let resolved = PayoutAlertRepo::resolve(
        &state.pool,
        tenant.tenant_id,
        id,
        &input.actor,
        input.notes.as_deref(),
    )
    .await?;

    let alert = match resolved {
        Some(alert) => {
            tracing::info!(
                tenant_id = tenant.tenant_id,
                alert_id = id,
                actor = %input.actor,
                "Alert resolved"
            );
            alert
        }
        None => PayoutAlertRepo::find_by_id(&state.pool, tenant.tenant_id, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "PayoutAlert",
                id,
            }))?,
    };

    Ok(Json(DataResponse { data: alert }))
}
