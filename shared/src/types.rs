//! Common types for the shared crate
//!
//! ID aliases and lenient serde helpers for backend fields whose JSON
//! shape varies (numbers sent as strings, dates sent as timestamps).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

/// Server-assigned report id
pub type ReportId = i64;

/// Server-assigned user id
pub type UserId = i64;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
    Float(f64),
}

/// Accept `"42"`, `42` or `null` for a string field
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|v| match v {
            StringOrNumber::Str(s) => s,
            StringOrNumber::Int(i) => i.to_string(),
            StringOrNumber::Float(f) => f.to_string(),
        }),
    )
}

/// Parse a calendar date out of `YYYY-MM-DD`, an RFC 3339 timestamp or
/// epoch milliseconds.
pub fn parse_date_lenient(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.date_naive())
}

/// Serde adapter for optional dates in any of the shapes
/// [`parse_date_lenient`] understands. Unparseable values become `None`.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(string_or_number(deserializer)?.and_then(|s| parse_date_lenient(&s)))
}
