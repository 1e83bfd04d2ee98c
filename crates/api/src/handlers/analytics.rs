//! Handlers for revenue analytics and report snapshots.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use staypay_core::error::CoreError;
use staypay_core::types::DbId;
use staypay_db::models::analytics::AnalyticsFilter;
use staypay_db::models::revenue_report::GenerateReport;
use staypay_db::repositories::{AnalyticsRepo, RevenueReportRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::tenant::TenantContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/analytics/summary
///
/// Totals over the payouts matching the filter: gross, net, commission
/// loss, booking count, and the arithmetic-mean commission rate.
pub async fn summary(
    tenant: TenantContext,
    State(state): State<AppState>,
    Query(filter): Query<AnalyticsFilter>,
) -> AppResult<impl IntoResponse> {
    let summary = AnalyticsRepo::summarize(&state.pool, tenant.tenant_id, &filter).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/analytics/platform-breakdown
pub async fn platform_breakdown(
    tenant: TenantContext,
    State(state): State<AppState>,
    Query(filter): Query<AnalyticsFilter>,
) -> AppResult<impl IntoResponse> {
    let breakdown =
        AnalyticsRepo::platform_breakdown(&state.pool, tenant.tenant_id, &filter).await?;
    Ok(Json(DataResponse { data: breakdown }))
}

/// GET /api/v1/analytics/monthly-trend
///
/// Gross/net/commission-loss per check-in month (`YYYY-MM`).
pub async fn monthly_trend(
    tenant: TenantContext,
    State(state): State<AppState>,
    Query(filter): Query<AnalyticsFilter>,
) -> AppResult<impl IntoResponse> {
    let trend = AnalyticsRepo::monthly_trend(&state.pool, tenant.tenant_id, &filter).await?;
    Ok(Json(DataResponse { data: trend }))
}

/// POST /api/v1/reports
///
/// Snapshot summary + platform breakdown for a period into an immutable
/// report. Regenerating the same period creates a new report; existing
/// ones never change.
pub async fn generate_report(
    tenant: TenantContext,
    State(state): State<AppState>,
    Json(input): Json<GenerateReport>,
) -> AppResult<impl IntoResponse> {
    if input.period_end < input.period_start {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Report period end {} precedes start {}",
            input.period_end, input.period_start
        ))));
    }

    let filter = AnalyticsFilter {
        check_in_from: Some(input.period_start),
        check_in_to: Some(input.period_end),
        ..Default::default()
    };
    let summary = AnalyticsRepo::summarize(&state.pool, tenant.tenant_id, &filter).await?;
    let breakdown =
        AnalyticsRepo::platform_breakdown(&state.pool, tenant.tenant_id, &filter).await?;
    let breakdown_json = serde_json::to_value(&breakdown)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize breakdown: {e}")))?;

    let report = RevenueReportRepo::create(
        &state.pool,
        tenant.tenant_id,
        input.period_start,
        input.period_end,
        &summary,
        &breakdown_json,
        &input.actor,
    )
    .await?;

    tracing::info!(
        tenant_id = tenant.tenant_id,
        report_id = report.id,
        period_start = %report.period_start,
        period_end = %report.period_end,
        booking_count = report.booking_count,
        "Revenue report generated"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

/// GET /api/v1/reports
pub async fn list_reports(
    tenant: TenantContext,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let reports = RevenueReportRepo::list(&state.pool, tenant.tenant_id).await?;
    Ok(Json(DataResponse { data: reports }))
}

/// GET /api/v1/reports/{id}
pub async fn get_report(
    tenant: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = RevenueReportRepo::find_by_id(&state.pool, tenant.tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "RevenueReport",
            id,
        }))?;
    Ok(Json(DataResponse { data: report }))
}
