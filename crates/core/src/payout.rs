//! Payout status machine and commission arithmetic.
//!
//! Statuses are stored as TEXT in the database; the enum here is the
//! single source of truth for the allowed values and transitions.
//! All amounts are [`Decimal`]: commission is rounded half-up to two
//! decimals exactly once, and the net payout is derived by subtraction
//! so that `commission + net == guest_paid` holds to the minor unit.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Payout awaiting verification against reality.
pub const STATUS_PENDING: &str = "pending";

/// A human has asserted the amounts are correct.
pub const STATUS_CONFIRMED: &str = "confirmed";

/// Funds verified as deposited; terminal.
pub const STATUS_RECEIVED: &str = "received";

/// Lifecycle state of a booking payout.
///
/// Advances `pending -> confirmed -> received` and never regresses.
/// A manual override is not a status of its own: it jumps the payout to
/// `confirmed` and raises the orthogonal `manual_override` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Confirmed,
    Received,
}

impl PayoutStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PayoutStatus::Pending => STATUS_PENDING,
            PayoutStatus::Confirmed => STATUS_CONFIRMED,
            PayoutStatus::Received => STATUS_RECEIVED,
        }
    }

    /// Parse a stored status string. Returns `None` for unknown values.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            STATUS_PENDING => Some(PayoutStatus::Pending),
            STATUS_CONFIRMED => Some(PayoutStatus::Confirmed),
            STATUS_RECEIVED => Some(PayoutStatus::Received),
            _ => None,
        }
    }
}

impl std::fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a forward status transition.
///
/// Only `pending -> confirmed` and `confirmed -> received` are legal
/// here. Idempotent re-application (confirm on confirmed, receive on
/// received) is handled by the caller before this check; overrides use
/// [`validate_override_from`] instead.
pub fn validate_transition(from: PayoutStatus, to: PayoutStatus) -> Result<(), CoreError> {
    use PayoutStatus::*;
    match (from, to) {
        (Pending, Confirmed) | (Confirmed, Received) => Ok(()),
        _ => Err(CoreError::InvalidTransition {
            from: from.as_str(),
            to: to.as_str(),
        }),
    }
}

/// Validate that a manual override may be applied in the current status.
///
/// Overrides land on `confirmed`, so they are accepted from `pending`
/// (skipping the plain confirm) and from `confirmed` (correcting figures
/// that were confirmed in error). A `received` payout is settled and can
/// no longer be overridden.
pub fn validate_override_from(current: PayoutStatus) -> Result<(), CoreError> {
    match current {
        PayoutStatus::Pending | PayoutStatus::Confirmed => Ok(()),
        PayoutStatus::Received => Err(CoreError::InvalidTransition {
            from: current.as_str(),
            to: STATUS_CONFIRMED,
        }),
    }
}

/// Commission and net amounts derived from a guest-paid amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayoutBreakdown {
    pub commission_amount: Decimal,
    pub net_payout_amount: Decimal,
}

/// The guest-paid amount may not be negative.
pub fn validate_guest_paid(amount: Decimal) -> Result<(), CoreError> {
    if amount < Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "Guest-paid amount must not be negative, got {amount}"
        )));
    }
    Ok(())
}

/// Commission rates are percentages in `[0, 100]`.
pub fn validate_commission_rate(rate: Decimal) -> Result<(), CoreError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(CoreError::Validation(format!(
            "Commission rate must be between 0 and 100, got {rate}"
        )));
    }
    Ok(())
}

/// Compute commission and net payout from a guest-paid amount and a
/// commission percentage.
///
/// The commission is rounded half-up to two decimals; the net payout is
/// the exact remainder and is never rounded independently.
pub fn compute_breakdown(
    guest_paid: Decimal,
    commission_rate: Decimal,
) -> Result<PayoutBreakdown, CoreError> {
    validate_guest_paid(guest_paid)?;
    validate_commission_rate(commission_rate)?;

    let commission = (guest_paid * commission_rate / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Ok(PayoutBreakdown {
        commission_amount: commission,
        net_payout_amount: guest_paid - commission,
    })
}

/// Validate operator-supplied override amounts against the stored
/// guest-paid amount.
///
/// The override replaces rate and commission, not the arithmetic
/// identity: `commission + net` must still equal `guest_paid` exactly.
pub fn verify_override(
    guest_paid: Decimal,
    commission_rate: Decimal,
    commission_amount: Decimal,
    net_payout_amount: Decimal,
) -> Result<(), CoreError> {
    validate_commission_rate(commission_rate)?;
    if commission_amount < Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "Commission amount must not be negative, got {commission_amount}"
        )));
    }
    if commission_amount + net_payout_amount != guest_paid {
        return Err(CoreError::InvariantViolation {
            guest_paid,
            commission: commission_amount,
            net: net_payout_amount,
        });
    }
    Ok(())
}
