//! Record timestamps and their storage text form.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// UTC timestamp used for `created_at` and `updated_at`.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time, truncated to the microsecond precision
/// that [`to_text`] keeps.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(6)
}

/// Render a timestamp as RFC 3339 with microsecond precision.
///
/// The fixed width keeps lexical order equal to chronological order, so
/// text columns can be sorted directly.
#[must_use]
pub fn to_text(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a timestamp previously produced by [`to_text`].
///
/// # Errors
///
/// Returns a [`chrono::ParseError`] when `text` is not RFC 3339.
pub fn from_text(text: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|ts| ts.with_timezone(&Utc))
}
