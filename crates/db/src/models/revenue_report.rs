//! Revenue report entity model and DTOs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use staypay_core::types::{DbId, TenantId, Timestamp};

/// A row from the `revenue_reports` table.
///
/// An immutable snapshot of `summarize` + `platform_breakdown` for a
/// period, taken at generation time. Regenerating the same period
/// creates a new row; existing rows are never updated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RevenueReport {
    pub id: DbId,
    pub tenant_id: TenantId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub gross_revenue: Decimal,
    pub net_payout: Decimal,
    pub commission_loss: Decimal,
    pub booking_count: i64,
    pub avg_commission_rate: Decimal,
    /// Snapshotted per-platform totals, serialized [`PlatformRevenue`] rows.
    pub platform_breakdown: serde_json::Value,
    pub generated_by: String,
    pub generated_at: Timestamp,
}

/// Request body for generating a report.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateReport {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub actor: String,
}
