//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument and a tenant id as the
//! second. Every query filters on the tenant id; a cross-tenant id
//! simply finds nothing.

pub mod analytics_repo;
pub mod booking_payout_repo;
pub mod payout_alert_repo;
pub mod payout_rule_repo;
pub mod revenue_report_repo;

pub use analytics_repo::AnalyticsRepo;
pub use booking_payout_repo::BookingPayoutRepo;
pub use payout_alert_repo::PayoutAlertRepo;
pub use payout_rule_repo::PayoutRuleRepo;
pub use revenue_report_repo::RevenueReportRepo;
