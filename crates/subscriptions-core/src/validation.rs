//! # Validation Module
//!
//! Input checks applied at the HTTP boundary before anything reaches storage.
//!
//! ## Usage
//! ```rust
//! use subscriptions_core::validation::{parse_id, validate_price};
//!
//! assert!(parse_id("not-a-uuid").is_err());
//! assert!(validate_price(-1).is_err());
//! ```

use uuid::Uuid;

use crate::error::SubscriptionError;
use crate::month::MonthDate;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, SubscriptionError>;

/// Parses a subscription or user identifier.
pub fn parse_id(raw: &str) -> ValidationResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| SubscriptionError::InvalidId)
}

/// Parses an optional `"MM-YYYY"` value; an empty string means absent.
pub fn parse_optional_month(raw: Option<&str>) -> ValidationResult<Option<MonthDate>> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => MonthDate::parse(value).map(Some),
    }
}

/// Prices are in the minor currency unit; zero is a valid free tier.
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(SubscriptionError::InvalidPrice);
    }
    Ok(())
}

/// The end of a subscription cannot come before its start.
pub fn validate_period(start: MonthDate, end: Option<MonthDate>) -> ValidationResult<()> {
    match end {
        Some(end) if end < start => Err(SubscriptionError::InvalidDate),
        _ => Ok(()),
    }
}
