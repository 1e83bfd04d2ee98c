use rust_decimal::Decimal;

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error(
        "No active payout rule for property {property_id} on platform '{platform}' \
         and no explicit commission rate supplied"
    )]
    RuleNotFound { property_id: DbId, platform: String },

    #[error("Invalid payout status transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Payout was modified concurrently; re-read and retry")]
    StaleState,

    #[error(
        "Payout amounts violate the additive identity: \
         commission {commission} + net {net} must equal guest paid {guest_paid}"
    )]
    InvariantViolation {
        guest_paid: Decimal,
        commission: Decimal,
        net: Decimal,
    },

    #[error("Validation failed: {0}")]
    Validation(String),
}
