//! Lenient calendar-date (de)serialization.
//!
//! The remote API emits dates either as `YYYY-MM-DD` or as full timestamps
//! (`2024-05-10T00:00:00.000+00:00`). Only the calendar day is meaningful
//! here, so both forms are truncated to their first ten characters.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parse the calendar day at the start of `raw`
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, DAY_FORMAT).ok()
}

pub mod day {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DAY_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_day(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid calendar date '{}'", raw)))
    }
}

pub mod day_option {
    use super::*;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.collect_str(&d.format(DAY_FORMAT)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_day(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid calendar date '{}'", raw))),
        }
    }
}
