//! Structured reading time.
//!
//! Readings carry timestamps of the form `YYYY-MM-DD HH:00`. They are parsed
//! once into a [`ReadingTime`], and both the grouping date and the hour of day
//! come from that single parse.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Calendar date plus hour of day (0..=23) of a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReadingTime {
    date: NaiveDate,
    hour: u32,
}

impl ReadingTime {
    /// Builds a reading time, returning `None` when `hour` is outside 0..=23.
    pub fn new(date: NaiveDate, hour: u32) -> Option<Self> {
        (hour < 24).then_some(Self { date, hour })
    }

    /// Parses `YYYY-MM-DD HH:MM`.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        let dt = NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)?;
        Ok(Self {
            date: dt.date(),
            hour: dt.hour(),
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// The date as `YYYY-MM-DD`, used as the grouping key.
    pub fn date_key(&self) -> String {
        format_date(self.date)
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_date(self.date), hour_label(self.hour))
    }
}

impl Serialize for ReadingTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReadingTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ReadingTime::parse(&s).map_err(serde::de::Error::custom)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formats an hour of day the way critical hours are declared, e.g. `"18:00"`.
pub fn hour_label(hour: u32) -> String {
    format!("{:02}:00", hour)
}
