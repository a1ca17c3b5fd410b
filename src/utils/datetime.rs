//! Date normalization utilities
//!
//! Upstream clients store event dates in two shapes: a native timestamp
//! (epoch milliseconds, or a `{seconds, nanoseconds}` object) and an
//! ISO-8601 string. Every read boundary goes through [`parse_instant`] so
//! no call site ever branches on the representation itself. Serialization
//! always emits RFC 3339, which makes re-serializing an already
//! string-dated payload idempotent.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::utils::errors::{Result, TourneyHubError};

/// Normalize any supported date representation into a UTC instant.
///
/// Accepted inputs:
/// - RFC 3339 / ISO-8601 strings (`"2025-05-01T10:00:00Z"`)
/// - naive datetime strings (`"2025-05-01T10:00:00"`, assumed UTC)
/// - plain dates (`"2025-05-01"`, midnight UTC)
/// - epoch milliseconds as a JSON number
/// - `{"seconds": .., "nanoseconds": ..}` objects (the store's native form)
pub fn parse_instant(value: &Value) -> Result<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_instant_str(s),
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .ok_or_else(|| TourneyHubError::InvalidDate(n.to_string()))?;
            Utc.timestamp_millis_opt(millis)
                .single()
                .ok_or_else(|| TourneyHubError::InvalidDate(format!("{millis} ms")))
        }
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .and_then(Value::as_i64)
                .ok_or_else(|| TourneyHubError::InvalidDate(value.to_string()))?;
            let nanos = map
                .get("nanoseconds")
                .and_then(Value::as_i64)
                .unwrap_or(0);
            Utc.timestamp_opt(seconds, nanos as u32)
                .single()
                .ok_or_else(|| TourneyHubError::InvalidDate(value.to_string()))
        }
        other => Err(TourneyHubError::InvalidDate(other.to_string())),
    }
}

/// Normalize a string-typed date into a UTC instant.
pub fn parse_instant_str(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap().and_utc());
    }
    Err(TourneyHubError::InvalidDate(s.to_string()))
}

/// Serde adapter for request fields carrying the dual date representation.
pub fn deserialize_instant<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    parse_instant(&value).map_err(serde::de::Error::custom)
}

/// Serde adapter for optional request fields carrying the dual date representation.
pub fn deserialize_opt_instant<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => parse_instant(&v)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Half-open UTC bounds of one calendar day: `[00:00, next day 00:00)`.
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_hms_opt(0, 0, 0).unwrap().and_utc();
    (start, start + chrono::Duration::days(1))
}

/// Human-readable form used in outgoing emails.
pub fn format_long(instant: &DateTime<Utc>) -> String {
    instant.format("%A, %B %e, %Y at %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rfc3339_string() {
        let dt = parse_instant(&json!("2025-05-01T10:00:00Z")).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_string_assumes_utc() {
        let dt = parse_instant(&json!("2025-05-01T10:00:00")).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_plain_date() {
        let dt = parse_instant(&json!("2025-05-01")).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_epoch_millis() {
        let expected = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
        let dt = parse_instant(&json!(expected.timestamp_millis())).unwrap();
        assert_eq!(dt, expected);
    }

    #[test]
    fn test_parse_native_timestamp_object() {
        let expected = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
        let dt = parse_instant(&json!({"seconds": expected.timestamp(), "nanoseconds": 0})).unwrap();
        assert_eq!(dt, expected);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_instant(&json!("not a date")).is_err());
        assert!(parse_instant(&json!(true)).is_err());
        assert!(parse_instant(&json!(null)).is_err());
    }

    #[test]
    fn test_serialization_is_idempotent() {
        // A string-dated input parses and re-serializes to the identical string.
        let input = "2025-05-01T10:00:00Z";
        let dt = parse_instant_str(input).unwrap();
        let serialized = serde_json::to_value(dt).unwrap();
        assert_eq!(serialized, json!(input));

        let reparsed = parse_instant(&serialized).unwrap();
        assert_eq!(serde_json::to_value(reparsed).unwrap(), json!(input));
    }

    #[test]
    fn test_day_bounds_are_half_open() {
        let day = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let (start, end) = day_bounds(day);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 5, 2, 0, 0, 0).unwrap());
    }
}
