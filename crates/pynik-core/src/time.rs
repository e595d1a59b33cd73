//! Timestamp helpers for calendar feeds.
//!
//! Feed timestamps are naive local times in the compact iCalendar form
//! `YYYYMMDDTHHMMSS`. No timezone conversion is applied: a feed that carries
//! a `TZID` parameter or a trailing `Z` is not interpreted, and the wall-clock
//! value is compared against the local "now" as-is.

use chrono::{Datelike, NaiveDateTime};

use crate::error::FeedError;

/// The `strftime` pattern of a feed timestamp.
pub const FEED_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Parses a `YYYYMMDDTHHMMSS` feed timestamp.
///
/// # Errors
///
/// Returns [`FeedError::InvalidTimestamp`] when the value does not match the
/// format exactly (trailing `Z`, date-only values and garbage are all
/// rejected).
pub fn parse_feed_timestamp(tag: &str, value: &str) -> Result<NaiveDateTime, FeedError> {
    NaiveDateTime::parse_from_str(value, FEED_TIMESTAMP_FORMAT).map_err(|source| {
        FeedError::InvalidTimestamp {
            tag: tag.to_string(),
            value: value.to_string(),
            source,
        }
    })
}

/// Returns `true` if both timestamps fall on the same calendar day.
///
/// Only the day of the month is compared: two events exactly one month
/// apart count as the same day.
pub fn same_day(a: &NaiveDateTime, b: &NaiveDateTime) -> bool {
    a.day() == b.day()
}
