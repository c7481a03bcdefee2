//! Period bucketing
//!
//! Maps a timestamp and a [`Granularity`] to a calendar bucket label:
//!
//! | granularity | key          |
//! |-------------|--------------|
//! | yearly      | `2024`       |
//! | monthly     | `2024-03`    |
//! | weekly      | `2024-W12`   |
//! | daily       | `2024-03-18` |
//!
//! Weekly keys follow ISO-8601 week numbering: the week-year is the year of
//! the week's Thursday, so 2024-12-30 lands in `2025-W01`.
//!
//! Keys are computed in the timestamp's own offset. Labels sort
//! lexicographically in chronological order for years 0..=9999.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc,
};

use crate::types::Granularity;

/// Errors raised while reading a timestamp string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Bucket label for a timestamp at the requested granularity
pub fn bucket_key<Tz: TimeZone>(timestamp: &DateTime<Tz>, granularity: Granularity) -> String {
    match granularity {
        Granularity::Yearly => format!("{:04}", timestamp.year()),
        Granularity::Monthly => format!("{:04}-{:02}", timestamp.year(), timestamp.month()),
        Granularity::Weekly => {
            let week = timestamp.iso_week();
            format!("{:04}-W{:02}", week.year(), week.week())
        }
        Granularity::Daily => timestamp.date_naive().format("%Y-%m-%d").to_string(),
    }
}

/// Bucket label for a UTC timestamp observed from a fixed offset
pub fn bucket_key_at(
    timestamp: &DateTime<Utc>,
    offset: &FixedOffset,
    granularity: Granularity,
) -> String {
    bucket_key(&timestamp.with_timezone(offset), granularity)
}

/// Bucket label for an ISO-8601 timestamp string
pub fn bucket_key_str(timestamp: &str, granularity: Granularity) -> Result<String, PeriodError> {
    let parsed = parse_timestamp(timestamp)?;
    Ok(bucket_key(&parsed, granularity))
}

/// Parse the timestamp forms a PostgREST-style store hands back.
///
/// Accepts RFC 3339 (`2024-03-18T10:00:00Z`, `...+05:30`), the Postgres text
/// form (`2024-03-18 10:00:00.123+00`), offset-less date-times and bare dates.
/// Values without an offset are read as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, PeriodError> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts);
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(ts) = DateTime::parse_from_str(value, format) {
            return Ok(ts);
        }
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    Err(PeriodError::InvalidTimestamp(value.to_string()))
}
