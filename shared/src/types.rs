//! Common types used across the platform

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// IST offset from UTC: 5 hours 30 minutes
pub const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

/// The fixed IST timezone offset (+05:30)
pub fn ist_offset() -> FixedOffset {
    // 19800 seconds is statically within the valid +/-24h range
    FixedOffset::east_opt(IST_OFFSET_SECONDS).unwrap()
}

/// Convert a UTC instant to IST
pub fn to_ist(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&ist_offset())
}

/// The IST calendar date of a UTC instant
///
/// Offer validity windows are compared against this date, not the UTC one.
pub fn ist_date(instant: DateTime<Utc>) -> NaiveDate {
    to_ist(instant).date_naive()
}

/// A time of day with minute resolution, e.g. "09:00"
///
/// Stored as minutes since midnight so delivery windows and slots can be
/// compared with plain integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Minutes in a day
    pub const MAX_MINUTES: u16 = 24 * 60;

    /// Build from minutes since midnight; `None` if out of range
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes < Self::MAX_MINUTES {
            Some(Self(minutes))
        } else {
            None
        }
    }

    /// Build from an hour/minute pair; `None` if out of range
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Minutes since midnight
    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s.split_once(':').ok_or("Time must be in HH:MM format")?;
        let hour: u16 = h.parse().map_err(|_| "Invalid hour")?;
        let minute: u16 = m.parse().map_err(|_| "Invalid minute")?;
        Self::from_hm(hour, minute).ok_or("Time out of range")
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
