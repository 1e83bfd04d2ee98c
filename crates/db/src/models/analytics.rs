//! Aggregated revenue views computed in SQL.
//!
//! Averaged commission rates are the arithmetic mean of per-booking
//! rates, not a revenue-weighted mean. That is the reporting contract;
//! changing it would silently alter every historical comparison.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use staypay_core::types::DbId;

/// Point-in-time totals over the payouts matching a filter.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub gross_revenue: Decimal,
    pub net_payout: Decimal,
    pub commission_loss: Decimal,
    pub booking_count: i64,
    pub avg_commission_rate: Decimal,
}

/// Totals for one OTA platform.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlatformRevenue {
    pub platform: String,
    pub booking_count: i64,
    pub gross_revenue: Decimal,
    pub net_payout: Decimal,
    pub avg_commission_rate: Decimal,
}

/// Totals for one check-in month (`YYYY-MM`, the booking's recorded
/// calendar).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub gross_revenue: Decimal,
    pub net_payout: Decimal,
    pub commission_loss: Decimal,
}

/// Optional scoping for the analytics queries. Date bounds apply to the
/// check-in date.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsFilter {
    pub property_id: Option<DbId>,
    pub platform: Option<String>,
    pub check_in_from: Option<NaiveDate>,
    pub check_in_to: Option<NaiveDate>,
}
