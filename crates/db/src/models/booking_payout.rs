//! Booking payout entity model and DTOs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use staypay_core::payout::PayoutStatus;
use staypay_core::types::{DbId, TenantId, Timestamp};

/// A row from the `booking_payouts` table.
///
/// Financial record: never hard-deleted. The amounts always satisfy
/// `commission_amount + net_payout_amount = guest_paid_amount` (enforced
/// both here and by a CHECK constraint).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingPayout {
    pub id: DbId,
    pub tenant_id: TenantId,
    pub property_id: DbId,
    /// Unique per tenant.
    pub reservation_code: String,
    pub guest_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub platform: String,
    pub guest_paid_amount: Decimal,
    /// ISO 4217 code, passed through unconverted.
    pub currency: String,
    pub commission_rate: Decimal,
    pub commission_amount: Decimal,
    pub net_payout_amount: Decimal,
    /// One of `pending`, `confirmed`, `received`.
    pub status: String,
    pub confirmed_by: Option<String>,
    pub confirmed_at: Option<Timestamp>,
    pub received_by: Option<String>,
    pub received_at: Option<Timestamp>,
    pub manual_override: bool,
    pub override_reason: Option<String>,
    pub override_by: Option<String>,
    pub override_at: Option<Timestamp>,
    /// The platform's own feed reported this payout.
    pub platform_sync_observed: bool,
    /// A parsed payout confirmation email referenced this payout.
    pub email_parse_observed: bool,
    /// Latest externally observed payout figure, alerting input only.
    pub observed_payout_amount: Option<Decimal>,
    pub alert_generated: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BookingPayout {
    /// The stored status as a [`PayoutStatus`]. `None` only if the row
    /// somehow carries a value outside the CHECK constraint.
    pub fn payout_status(&self) -> Option<PayoutStatus> {
        PayoutStatus::parse(&self.status)
    }
}

/// Booking facts from the registry, as received by the create endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingPayout {
    pub property_id: DbId,
    pub reservation_code: String,
    pub guest_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub platform: String,
    pub guest_paid_amount: Decimal,
    pub currency: String,
    /// Explicit rate overriding the rule lookup. Without it, a missing
    /// active rule fails the create (never silently 0%).
    pub commission_rate: Option<Decimal>,
    pub notes: Option<String>,
}

/// Fully computed insert payload, produced by the engine from
/// [`CreateBookingPayout`] plus the applicable rate.
#[derive(Debug, Clone)]
pub struct NewBookingPayout {
    pub property_id: DbId,
    pub reservation_code: String,
    pub guest_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub platform: String,
    pub guest_paid_amount: Decimal,
    pub currency: String,
    pub commission_rate: Decimal,
    pub commission_amount: Decimal,
    pub net_payout_amount: Decimal,
    pub notes: Option<String>,
}

/// Operator-supplied correction applied by the override endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OverridePayout {
    pub commission_rate: Decimal,
    pub commission_amount: Decimal,
    pub net_payout_amount: Decimal,
    pub reason: String,
    pub actor: String,
}

/// An externally observed payout fact (platform sync or parsed email).
#[derive(Debug, Clone, Deserialize)]
pub struct RecordObservation {
    /// `platform_sync` or `email_parse`.
    pub source: String,
    pub observed_payout_amount: Option<Decimal>,
}

/// Optional filters for payout listing. Date bounds apply to the
/// check-in date.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayoutFilter {
    pub property_id: Option<DbId>,
    pub platform: Option<String>,
    pub status: Option<String>,
    pub check_in_from: Option<NaiveDate>,
    pub check_in_to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
