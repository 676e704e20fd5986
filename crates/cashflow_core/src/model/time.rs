//! Instants that remember the UTC offset they were written in
//!
//! An event's anchor arrives as RFC 3339 text such as
//! `2025-01-15T22:00:00-05:00`. The offset decides which local calendar the
//! rule repeats on and which date an exception key names, so it is kept next
//! to the instant instead of being normalised away.

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::fmt::temporal::Pieces;
use jiff::tz::{Offset, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A `Timestamp` plus the offset it is displayed and dated in.
///
/// Ordering is by instant first, so sorting these sorts a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OffsetTimestamp {
    pub timestamp: Timestamp,
    pub offset: Offset,
}

impl OffsetTimestamp {
    pub fn new(timestamp: Timestamp, offset: Offset) -> Self {
        Self { timestamp, offset }
    }

    pub fn utc(timestamp: Timestamp) -> Self {
        Self::new(timestamp, Offset::UTC)
    }

    /// `timestamp` with whatever offset `tz` has at that instant
    pub fn in_zone(timestamp: Timestamp, tz: &TimeZone) -> Self {
        Self::new(timestamp, tz.to_offset(timestamp))
    }

    /// Wall-clock time at this instant in this offset
    pub fn datetime(&self) -> DateTime {
        self.offset.to_datetime(self.timestamp)
    }

    /// A fixed zone for the offset
    pub fn time_zone(&self) -> TimeZone {
        TimeZone::fixed(self.offset)
    }
}

impl From<Timestamp> for OffsetTimestamp {
    fn from(timestamp: Timestamp) -> Self {
        Self::utc(timestamp)
    }
}

/// Compares the instant only
impl PartialEq<Timestamp> for OffsetTimestamp {
    fn eq(&self, other: &Timestamp) -> bool {
        self.timestamp == *other
    }
}

impl FromStr for OffsetTimestamp {
    type Err = jiff::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let timestamp: Timestamp = s.parse()?;
        let offset = Pieces::parse(s)?
            .to_numeric_offset()
            .unwrap_or(Offset::UTC);
        Ok(Self::new(timestamp, offset))
    }
}

/// RFC 3339; UTC is written with `Z`
impl fmt::Display for OffsetTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.offset == Offset::UTC {
            write!(f, "{}", self.timestamp)
        } else {
            write!(f, "{}", self.timestamp.display_with_offset(self.offset))
        }
    }
}

impl Serialize for OffsetTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OffsetTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
