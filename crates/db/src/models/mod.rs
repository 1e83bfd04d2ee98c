pub mod analytics;
pub mod booking_payout;
pub mod payout_alert;
pub mod payout_rule;
pub mod revenue_report;
