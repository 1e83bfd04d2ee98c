//! Payout rule entity model and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use staypay_core::types::{DbId, TenantId, Timestamp};

/// A row from the `payout_rules` table.
///
/// At most one row per (tenant, property, platform) is active at a
/// time; superseded rules are deactivated, never deleted, so historical
/// payouts keep a traceable rule context.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PayoutRule {
    pub id: DbId,
    pub tenant_id: TenantId,
    pub property_id: DbId,
    pub platform: String,
    /// Default commission percentage in [0, 100], two-decimal precision.
    pub commission_rate: Decimal,
    /// Trust the platform's own reported payout rather than computing it.
    pub use_external_payout: bool,
    pub manual_override_allowed: bool,
    pub alert_on_payout_missing: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing the active rule for a
/// (property, platform) key.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertPayoutRule {
    pub commission_rate: Decimal,
    /// Defaults to `false` if omitted.
    pub use_external_payout: Option<bool>,
    /// Defaults to `true` if omitted.
    pub manual_override_allowed: Option<bool>,
    /// Defaults to `true` if omitted.
    pub alert_on_payout_missing: Option<bool>,
}
