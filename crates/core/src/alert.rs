//! Alert evaluation for payout reconciliation.
//!
//! [`evaluate`] is a pure function of a payout's current state: it
//! produces the alerts that *should* exist right now, and the
//! persistence layer diffs that against the unresolved alerts already on
//! record (refreshing instead of duplicating). Nothing here touches the
//! database.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::payout::PayoutStatus;

/// A pending payout whose check-out is too far in the past.
pub const ALERT_PAYOUT_MISSING: &str = "payout_missing";

/// A manually overridden payout awaiting human sign-off on the audit trail.
pub const ALERT_MANUAL_REVIEW_NEEDED: &str = "manual_review_needed";

/// The externally observed payout differs from the computed net amount.
pub const ALERT_AMOUNT_MISMATCH: &str = "amount_mismatch";

/// Severity of a payout alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

/// Thresholds governing alert evaluation.
#[derive(Debug, Clone)]
pub struct AlertThresholds {
    /// Days past check-out before a pending payout raises `payout_missing`.
    pub missing_after_days: i64,
    /// Days past check-out before `payout_missing` escalates to high severity.
    pub escalate_after_days: i64,
    /// Absolute difference between observed and computed net payout that
    /// is tolerated before `amount_mismatch` fires (absorbs rounding).
    pub mismatch_tolerance: Decimal,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            missing_after_days: 5,
            escalate_after_days: 14,
            mismatch_tolerance: Decimal::ONE,
        }
    }
}

/// The slice of payout + rule state that alert evaluation reads.
#[derive(Debug)]
pub struct AlertInput<'a> {
    pub reservation_code: &'a str,
    pub status: PayoutStatus,
    pub check_out: NaiveDate,
    pub net_payout_amount: Decimal,
    pub manual_override: bool,
    pub override_reason: Option<&'a str>,
    /// Latest externally observed payout figure, if any.
    pub observed_payout_amount: Option<Decimal>,
    /// The active rule's `alert_on_payout_missing` flag; `false` when no
    /// rule is on file.
    pub alert_on_payout_missing: bool,
}

/// An alert that should exist for a payout, before deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDraft {
    pub alert_type: &'static str,
    pub severity: AlertSeverity,
    pub message: String,
}

/// Compute the alerts a payout warrants in its current state.
///
/// `today` is the caller's business date; evaluation never reads the
/// clock itself.
pub fn evaluate(
    input: &AlertInput<'_>,
    thresholds: &AlertThresholds,
    today: NaiveDate,
) -> Vec<AlertDraft> {
    let mut drafts = Vec::new();

    if input.status == PayoutStatus::Pending && input.alert_on_payout_missing {
        let days_overdue = (today - input.check_out).num_days();
        if days_overdue > thresholds.missing_after_days {
            let severity = if days_overdue > thresholds.escalate_after_days {
                AlertSeverity::High
            } else {
                AlertSeverity::Medium
            };
            drafts.push(AlertDraft {
                alert_type: ALERT_PAYOUT_MISSING,
                severity,
                message: format!(
                    "Payout for reservation {} is {} days past check-out with no confirmation",
                    input.reservation_code, days_overdue
                ),
            });
        }
    }

    if input.manual_override {
        let message = match input.override_reason {
            Some(reason) => format!(
                "Payout for reservation {} was manually overridden: {reason}",
                input.reservation_code
            ),
            None => format!(
                "Payout for reservation {} was manually overridden",
                input.reservation_code
            ),
        };
        drafts.push(AlertDraft {
            alert_type: ALERT_MANUAL_REVIEW_NEEDED,
            severity: AlertSeverity::Low,
            message,
        });
    }

    if let Some(observed) = input.observed_payout_amount {
        let diff = (observed - input.net_payout_amount).abs();
        if diff > thresholds.mismatch_tolerance {
            drafts.push(AlertDraft {
                alert_type: ALERT_AMOUNT_MISMATCH,
                severity: AlertSeverity::High,
                message: format!(
                    "Observed payout {observed} differs from computed net {} by {diff} \
                     for reservation {}",
                    input.net_payout_amount, input.reservation_code
                ),
            });
        }
    }

    drafts
}
