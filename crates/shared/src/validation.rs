//! Field validators shared by the donation request types.

use chrono::{DateTime, Utc};
use validator::ValidationError;

/// Tolerance for expiration timestamps slightly in the past (5 minutes for clock skew).
const EXPIRATION_SKEW_TOLERANCE_SECS: i64 = 300;

/// Validates that a donation quantity is positive.
pub fn validate_quantity(quantity: i32) -> Result<(), ValidationError> {
    if quantity > 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("quantity_range");
        err.message = Some("Quantity must be greater than zero".into());
        Err(err)
    }
}

/// Validates that an expiration date is not in the past.
/// A small tolerance window is allowed for clock skew between client and server.
pub fn validate_expiration_date(expiration: &DateTime<Utc>) -> Result<(), ValidationError> {
    let past_limit = Utc::now() - chrono::Duration::seconds(EXPIRATION_SKEW_TOLERANCE_SECS);
    if *expiration >= past_limit {
        Ok(())
    } else {
        let mut err = ValidationError::new("expiration_past");
        err.message = Some("Expiration date cannot be in the past".into());
        Err(err)
    }
}
