//! Pure domain logic for the payout reconciliation engine.
//!
//! No I/O lives here: commission arithmetic, the payout status machine,
//! OTA platform naming, alert evaluation, and the domain error taxonomy
//! are all plain functions over plain data, shared by the DB and API
//! layers.

pub mod alert;
pub mod error;
pub mod payout;
pub mod platform;
pub mod types;
