//! OTA platform naming.
//!
//! Platform names are free-form lowercase identifiers rather than a
//! closed enum: new booking channels appear without a schema change.
//! The constants below cover the channels every deployment starts with.

/// Airbnb.
pub const PLATFORM_AIRBNB: &str = "airbnb";

/// Booking.com.
pub const PLATFORM_BOOKING_COM: &str = "booking_com";

/// VRBO.
pub const PLATFORM_VRBO: &str = "vrbo";

/// Direct bookings (no OTA commission by default).
pub const PLATFORM_DIRECT: &str = "direct";

/// Normalize and validate a platform name.
///
/// Trims surrounding whitespace and lowercases. The result must be
/// non-empty and contain only `a-z`, `0-9`, and `_`.
pub fn normalize_platform(raw: &str) -> Result<String, String> {
    let name = raw.trim().to_ascii_lowercase();
    if name.is_empty() {
        return Err("Platform name must not be empty".to_string());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(format!(
            "Invalid platform name '{name}'. Use lowercase letters, digits, and underscores"
        ));
    }
    Ok(name)
}
