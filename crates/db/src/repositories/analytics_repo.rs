//! Aggregation queries over `booking_payouts`.
//!
//! All aggregation happens in SQL so large tenants never materialize
//! their full payout history in process memory. Summaries are
//! point-in-time reads and make no linearizability promise against
//! in-flight mutations.

use sqlx::PgPool;
use staypay_core::types::TenantId;

use crate::models::analytics::{AnalyticsFilter, MonthlyRevenue, PlatformRevenue, RevenueSummary};

/// Shared WHERE clause for the three aggregate queries; binds are
/// tenant, property, platform, check-in from, check-in to.
const FILTER: &str = "tenant_id = $1 \
    AND ($2::BIGINT IS NULL OR property_id = $2) \
    AND ($3::TEXT IS NULL OR platform = $3) \
    AND ($4::DATE IS NULL OR check_in >= $4) \
    AND ($5::DATE IS NULL OR check_in <= $5)";

/// Provides revenue summary, per-platform, and per-month aggregates.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Totals over all payouts matching the filter.
    ///
    /// `avg_commission_rate` is the arithmetic mean of per-booking
    /// rates. A revenue-weighted mean would report differently for
    /// mixed-value portfolios; the flat mean is the documented contract.
    pub async fn summarize(
        pool: &PgPool,
        tenant_id: TenantId,
        filter: &AnalyticsFilter,
    ) -> Result<RevenueSummary, sqlx::Error> {
        let query = format!(
            "SELECT \
                COALESCE(SUM(guest_paid_amount), 0) AS gross_revenue, \
                COALESCE(SUM(net_payout_amount), 0) AS net_payout, \
                COALESCE(SUM(commission_amount), 0) AS commission_loss, \
                COUNT(*) AS booking_count, \
                COALESCE(ROUND(AVG(commission_rate), 2), 0) AS avg_commission_rate \
             FROM booking_payouts WHERE {FILTER}"
        );
        sqlx::query_as::<_, RevenueSummary>(&query)
            .bind(tenant_id)
            .bind(filter.property_id)
            .bind(&filter.platform)
            .bind(filter.check_in_from)
            .bind(filter.check_in_to)
            .fetch_one(pool)
            .await
    }

    /// Totals grouped by OTA platform, ordered by platform name for
    /// stable snapshots.
    pub async fn platform_breakdown(
        pool: &PgPool,
        tenant_id: TenantId,
        filter: &AnalyticsFilter,
    ) -> Result<Vec<PlatformRevenue>, sqlx::Error> {
        let query = format!(
            "SELECT \
                platform, \
                COUNT(*) AS booking_count, \
                COALESCE(SUM(guest_paid_amount), 0) AS gross_revenue, \
                COALESCE(SUM(net_payout_amount), 0) AS net_payout, \
                COALESCE(ROUND(AVG(commission_rate), 2), 0) AS avg_commission_rate \
             FROM booking_payouts WHERE {FILTER} \
             GROUP BY platform \
             ORDER BY platform"
        );
        sqlx::query_as::<_, PlatformRevenue>(&query)
            .bind(tenant_id)
            .bind(filter.property_id)
            .bind(&filter.platform)
            .bind(filter.check_in_from)
            .bind(filter.check_in_to)
            .fetch_all(pool)
            .await
    }

    /// Totals grouped by check-in month (`YYYY-MM`). The grouping key is
    /// the booking's recorded calendar date, independent of any clock.
    pub async fn monthly_trend(
        pool: &PgPool,
        tenant_id: TenantId,
        filter: &AnalyticsFilter,
    ) -> Result<Vec<MonthlyRevenue>, sqlx::Error> {
        let query = format!(
            "SELECT \
                to_char(check_in, 'YYYY-MM') AS month, \
                COALESCE(SUM(guest_paid_amount), 0) AS gross_revenue, \
                COALESCE(SUM(net_payout_amount), 0) AS net_payout, \
                COALESCE(SUM(commission_amount), 0) AS commission_loss \
             FROM booking_payouts WHERE {FILTER} \
             GROUP BY to_char(check_in, 'YYYY-MM') \
             ORDER BY month"
        );
        sqlx::query_as::<_, MonthlyRevenue>(&query)
            .bind(tenant_id)
            .bind(filter.property_id)
            .bind(&filter.platform)
            .bind(filter.check_in_from)
            .bind(filter.check_in_to)
            .fetch_all(pool)
            .await
    }
}
