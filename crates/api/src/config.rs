use std::str::FromStr;

use rust_decimal::Decimal;
use staypay_core::alert::AlertThresholds;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Days past check-out before a pending payout raises `payout_missing`.
    pub alert_missing_after_days: i64,
    /// Days past check-out before `payout_missing` escalates to high.
    pub alert_escalate_after_days: i64,
    /// Tolerated difference between observed and computed net payout.
    pub alert_mismatch_tolerance: Decimal,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                    |
    /// |------------------------------|----------------------------|
    /// | `HOST`                       | `0.0.0.0`                  |
    /// | `PORT`                       | `3000`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                       |
    /// | `ALERT_MISSING_AFTER_DAYS`   | `5`                        |
    /// | `ALERT_ESCALATE_AFTER_DAYS`  | `14`                       |
    /// | `ALERT_MISMATCH_TOLERANCE`   | `1.00`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let alert_missing_after_days: i64 = std::env::var("ALERT_MISSING_AFTER_DAYS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("ALERT_MISSING_AFTER_DAYS must be a valid i64");

        let alert_escalate_after_days: i64 = std::env::var("ALERT_ESCALATE_AFTER_DAYS")
            .unwrap_or_else(|_| "14".into())
            .parse()
            .expect("ALERT_ESCALATE_AFTER_DAYS must be a valid i64");

        let alert_mismatch_tolerance = Decimal::from_str(
            &std::env::var("ALERT_MISMATCH_TOLERANCE").unwrap_or_else(|_| "1.00".into()),
        )
        .expect("ALERT_MISMATCH_TOLERANCE must be a valid decimal");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            alert_missing_after_days,
            alert_escalate_after_days,
            alert_mismatch_tolerance,
        }
    }

    /// The alert thresholds as the core evaluation expects them.
    pub fn alert_thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            missing_after_days: self.alert_missing_after_days,
            escalate_after_days: self.alert_escalate_after_days,
            mismatch_tolerance: self.alert_mismatch_tolerance,
        }
    }
}
