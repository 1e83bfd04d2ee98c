//! Reconciliation engine: lifecycle orchestration shared by the payout
//! handlers.
//!
//! Handlers stay thin; the sequencing rules (rule resolution before
//! computation, compare-and-set transitions, alert re-evaluation after
//! every mutation) live here so there is exactly one implementation of
//! each.

pub mod reconcile;
