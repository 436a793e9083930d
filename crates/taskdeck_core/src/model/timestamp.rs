//! ISO 8601 instant encoding shared by every task timestamp.
//!
//! Instants are written as `YYYY-MM-DDTHH:MM:SS.mmmZ` and read back from any
//! RFC 3339 string. Optional instants (due dates) also accept a bare
//! `YYYY-MM-DD` date, read as midnight UTC, and treat `""` as absent.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, SubsecRound, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

/// Truncates an instant to millisecond precision.
///
/// Stamps go through this before being stored so the in-memory value equals
/// what a JSON round trip produces.
pub fn stamp(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(3)
}

/// Formats an instant the way the slot payload stores it.
pub fn to_iso(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an RFC 3339 instant into UTC.
pub fn parse_iso(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value.trim()).map(|parsed| parsed.with_timezone(&Utc))
}

/// Parses an RFC 3339 instant, or a calendar date as midnight UTC.
pub fn parse_iso_or_date(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let trimmed = value.trim();
    parse_iso(trimmed).or_else(|err| {
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
            .map_err(|_| err)
    })
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_iso(value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_iso(&raw).map_err(|err| D::Error::custom(format!("invalid instant `{raw}`: {err}")))
}

/// Same encoding for optional instants.
pub mod option {
    use super::{parse_iso_or_date, to_iso};
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(instant) => serializer.serialize_some(&to_iso(instant)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_iso_or_date(&raw)
                .map(Some)
                .map_err(|err| D::Error::custom(format!("invalid instant `{raw}`: {err}"))),
            None => Ok(None),
        }
    }
}
