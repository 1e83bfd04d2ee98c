//! Repository for the `revenue_reports` table.
//!
//! Reports are write-once: there is deliberately no update method here.
//! Regenerating a period inserts a new snapshot alongside the old one.

use chrono::NaiveDate;
use sqlx::PgPool;
use staypay_core::types::{DbId, TenantId};

use crate::models::analytics::RevenueSummary;
use crate::models::revenue_report::RevenueReport;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tenant_id, period_start, period_end, gross_revenue, \
    net_payout, commission_loss, booking_count, avg_commission_rate, \
    platform_breakdown, generated_by, generated_at";

/// Provides snapshot insertion and read-back.
pub struct RevenueReportRepo;

impl RevenueReportRepo {
    /// Persist a generated snapshot.
    pub async fn create(
        pool: &PgPool,
        tenant_id: TenantId,
        period_start: NaiveDate,
        period_end: NaiveDate,
        summary: &RevenueSummary,
        platform_breakdown: &serde_json::Value,
        generated_by: &str,
    ) -> Result<RevenueReport, sqlx::Error> {
        let query = format!(
            "INSERT INTO revenue_reports \
                (tenant_id, period_start, period_end, gross_revenue, net_payout, \
                 commission_loss, booking_count, avg_commission_rate, \
                 platform_breakdown, generated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RevenueReport>(&query)
            .bind(tenant_id)
            .bind(period_start)
            .bind(period_end)
            .bind(summary.gross_revenue)
            .bind(summary.net_payout)
            .bind(summary.commission_loss)
            .bind(summary.booking_count)
            .bind(summary.avg_commission_rate)
            .bind(platform_breakdown)
            .bind(generated_by)
            .fetch_one(pool)
            .await
    }

    /// Find a report by id.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: TenantId,
        id: DbId,
    ) -> Result<Option<RevenueReport>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM revenue_reports WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, RevenueReport>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List reports for a tenant, newest generation first.
    pub async fn list(
        pool: &PgPool,
        tenant_id: TenantId,
    ) -> Result<Vec<RevenueReport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM revenue_reports \
             WHERE tenant_id = $1 \
             ORDER BY generated_at DESC, id DESC"
        );
        sqlx::query_as::<_, RevenueReport>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await
    }
}
