//! RFC 5545 recurrence rules
//!
//! Covers the subset a cash-flow calendar needs: yearly, monthly, weekly and
//! daily rules with `INTERVAL`, `COUNT`/`UNTIL`, `BYMONTH`, `BYMONTHDAY`,
//! `BYDAY` (with ordinals), `BYSETPOS` and `WKST`.
//!
//! Expansion follows the dateutil / rrule-go reading of the RFC: when a rule
//! names no day selector the start date supplies one, dates that do not exist
//! (the 31st of a 30-day month) are skipped rather than clamped, and the
//! start itself is only emitted when it matches the rule.
//!
//! ```ignore
//! let rule: RecurrenceRule = "FREQ=MONTHLY;BYDAY=-1FR;COUNT=3".parse()?;
//! let fridays: Vec<_> = rule.instances(dtstart, limit, &TimeZone::UTC).collect();
//! ```

mod expand;
mod parse;

use std::fmt;
use std::str::FromStr;

use crate::error::RuleError;
use jiff::Timestamp;
use jiff::civil::{DateTime, Weekday};
use jiff::tz::TimeZone;

pub use expand::Instances;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Yearly,
    Monthly,
    Weekly,
    Daily,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Yearly => "YEARLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Daily => "DAILY",
        }
    }
}

/// One `BYDAY` entry: a weekday, optionally the n-th of its month or year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayRule {
    /// 1-based from the start, negative from the end; `None` means every one
    pub ordinal: Option<i8>,
    pub weekday: Weekday,
}

impl WeekdayRule {
    pub fn every(weekday: Weekday) -> Self {
        Self {
            ordinal: None,
            weekday,
        }
    }

    pub fn nth(ordinal: i8, weekday: Weekday) -> Self {
        Self {
            ordinal: Some(ordinal),
            weekday,
        }
    }
}

/// Inclusive end of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Until {
    /// `YYYYMMDD` or `YYYYMMDDTHHMMSS`, read in the projection time zone
    Floating(DateTime),
    /// `YYYYMMDDTHHMMSSZ`
    Utc(Timestamp),
}

impl Until {
    pub fn resolve(&self, tz: &TimeZone) -> DateTime {
        match self {
            Until::Floating(dt) => *dt,
            Until::Utc(ts) => tz.to_datetime(*ts),
        }
    }
}

/// A parsed RRULE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    pub count: Option<u32>,
    pub until: Option<Until>,
    pub by_month: Vec<i8>,
    pub by_month_day: Vec<i8>,
    pub by_day: Vec<WeekdayRule>,
    pub by_set_pos: Vec<i16>,
    pub week_start: Weekday,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            count: None,
            until: None,
            by_month: Vec::new(),
            by_month_day: Vec::new(),
            by_day: Vec::new(),
            by_set_pos: Vec::new(),
            week_start: Weekday::Monday,
        }
    }

    #[must_use]
    pub fn interval(mut self, interval: u32) -> Self {
        self.interval = interval.max(1);
        self
    }

    #[must_use]
    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self.until = None;
        self
    }

    #[must_use]
    pub fn until(mut self, until: Until) -> Self {
        self.until = Some(until);
        self.count = None;
        self
    }

    #[must_use]
    pub fn by_day(mut self, rules: impl IntoIterator<Item = WeekdayRule>) -> Self {
        self.by_day = rules.into_iter().collect();
        self
    }

    #[must_use]
    pub fn by_month_day(mut self, days: impl IntoIterator<Item = i8>) -> Self {
        self.by_month_day = days.into_iter().collect();
        self
    }

    /// Lazily generate instances from `dtstart` up to and including
    /// `window_end` (or `UNTIL`, whichever is earlier), in ascending order.
    pub fn instances(
        &self,
        dtstart: DateTime,
        window_end: DateTime,
        tz: &TimeZone,
    ) -> Instances<'_> {
        let limit = match self.until {
            Some(until) => until.resolve(tz).min(window_end),
            None => window_end,
        };
        Instances::new(self, dtstart, limit)
    }
}

impl FromStr for RecurrenceRule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse_rule(s)
    }
}

pub(crate) fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "MO",
        Weekday::Tuesday => "TU",
        Weekday::Wednesday => "WE",
        Weekday::Thursday => "TH",
        Weekday::Friday => "FR",
        Weekday::Saturday => "SA",
        Weekday::Sunday => "SU",
    }
}

fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    values: &[T],
) -> fmt::Result {
    if values.is_empty() {
        return Ok(());
    }
    write!(f, ";{name}=")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

impl fmt::Display for WeekdayRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.ordinal {
            write!(f, "{n}")?;
        }
        f.write_str(weekday_code(self.weekday))
    }
}

/// Canonical form: parts in a fixed order, defaults omitted
impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={}", self.frequency.as_str())?;
        if self.interval != 1 {
            write!(f, ";INTERVAL={}", self.interval)?;
        }
        if let Some(count) = self.count {
            write!(f, ";COUNT={count}")?;
        }
        match self.until {
            Some(Until::Floating(dt)) => write!(f, ";UNTIL={}", dt.strftime("%Y%m%dT%H%M%S"))?,
            Some(Until::Utc(ts)) => write!(f, ";UNTIL={}", ts.strftime("%Y%m%dT%H%M%SZ"))?,
            None => {}
        }
        write_list(f, "BYMONTH", &self.by_month)?;
        write_list(f, "BYMONTHDAY", &self.by_month_day)?;
        write_list(f, "BYDAY", &self.by_day)?;
        write_list(f, "BYSETPOS", &self.by_set_pos)?;
        if self.week_start != Weekday::Monday {
            write!(f, ";WKST={}", weekday_code(self.week_start))?;
        }
        Ok(())
    }
}
