//! Payout alert entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use staypay_core::types::{DbId, TenantId, Timestamp};

/// A row from the `payout_alerts` table.
///
/// At most one unresolved alert of a given type exists per payout;
/// re-evaluation refreshes the existing row. Alerts close only through
/// an explicit resolve action.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PayoutAlert {
    pub id: DbId,
    pub tenant_id: TenantId,
    pub payout_id: DbId,
    pub alert_type: String,
    pub severity: String,
    pub message: String,
    pub is_resolved: bool,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<Timestamp>,
    pub resolution_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for resolving an alert.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveAlert {
    pub actor: String,
    pub notes: Option<String>,
}

/// Optional filters for alert listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertFilter {
    pub payout_id: Option<DbId>,
    pub alert_type: Option<String>,
    pub severity: Option<String>,
    pub resolved: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
