//! Epoch-millisecond timestamps and UTC day-boundary arithmetic.
//!
//! Day boundaries are computed with integer math on the number of days since
//! the Unix epoch, never through local-time conversions.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const MS_PER_DAY: i64 = 86_400_000;

/// `NaiveDate::from_ymd(1970, 1, 1).num_days_from_ce()`
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Milliseconds since the Unix epoch, UTC.
///
/// Serialized as an ISO-8601 string with millisecond precision
/// (`2024-01-05T23:59:59.999Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// First instant (00:00:00.000) of the given UTC day.
    pub fn start_of_utc_day(date: NaiveDate) -> Self {
        Self(days_since_epoch(date) * MS_PER_DAY)
    }

    /// Last instant (23:59:59.999) of the given UTC day.
    pub fn end_of_utc_day(date: NaiveDate) -> Self {
        Self(days_since_epoch(date) * MS_PER_DAY + MS_PER_DAY - 1)
    }

    /// Parses RFC 3339 (`2024-01-05T10:00:00Z`, with offset) or a zone-less
    /// `2024-01-05T10:00:00[.fff]`, which is read as UTC.
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.timestamp_millis()));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| Self(naive.and_utc().timestamp_millis()))
    }

    pub fn to_rfc3339(&self) -> String {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            None => self.0.to_string(),
        }
    }
}

fn days_since_epoch(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
