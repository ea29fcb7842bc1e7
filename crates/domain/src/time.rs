//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp stamped on alerts, actions and decisions.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse an RFC 3339 string back into a UTC [`Timestamp`].
///
/// # Errors
///
/// Returns the chrono parse error when `text` is not RFC 3339.
pub fn parse_rfc3339(text: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|ts| ts.to_utc())
}
