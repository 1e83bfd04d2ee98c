pub mod alerts;
pub mod analytics;
pub mod payouts;
pub mod rules;
