//! Event definitions - the recurring and one-off cash flows being projected
//!
//! An event posts a signed amount into one account, either once at its start
//! instant or repeatedly according to an RRULE. Per-date exceptions override
//! the amount of individual occurrences or remove them entirely.

use std::collections::BTreeMap;

use super::ids::{AccountId, EventId};
use super::time::OffsetTimestamp;
use jiff::civil::Date;
use serde::{Deserialize, Deserializer, Serialize};

/// Whether an event adds to or takes from its account
///
/// Unrecognised values are preserved verbatim rather than rejected so a
/// snapshot written by a newer client still projects; they have no effect on
/// balances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    Income,
    Expense,
    Other(String),
}

impl Direction {
    pub fn as_str(&self) -> &str {
        match self {
            Direction::Income => "income",
            Direction::Expense => "expense",
            Direction::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Direction::Other(_))
    }

    /// Apply one occurrence of `amount` to a running total
    pub fn apply(&self, total: i64, amount: i64) -> i64 {
        match self {
            Direction::Income => total.saturating_add(amount),
            Direction::Expense => total.saturating_sub(amount),
            Direction::Other(_) => total,
        }
    }
}

impl From<String> for Direction {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "income" => Direction::Income,
            "expense" => Direction::Expense,
            _ => Direction::Other(raw),
        }
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// How an exception changes the occurrence on its date
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExceptionKind {
    /// Replace the amount of this one occurrence
    Single,
    /// Replace the amount of this and every later occurrence
    Forever,
    /// Drop this occurrence
    Skip,
    Unknown(String),
}

impl ExceptionKind {
    pub fn as_str(&self) -> &str {
        match self {
            ExceptionKind::Single => "single",
            ExceptionKind::Forever => "forever",
            ExceptionKind::Skip => "skip",
            ExceptionKind::Unknown(raw) => raw,
        }
    }
}

impl From<String> for ExceptionKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "single" => ExceptionKind::Single,
            "forever" => ExceptionKind::Forever,
            "skip" => ExceptionKind::Skip,
            _ => ExceptionKind::Unknown(raw),
        }
    }
}

impl From<ExceptionKind> for String {
    fn from(kind: ExceptionKind) -> Self {
        match kind {
            ExceptionKind::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Per-date override of a recurring event's occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    #[serde(rename = "type")]
    pub kind: ExceptionKind,
    /// Ignored for `skip`; a missing amount reads as zero
    #[serde(default)]
    pub amount: i64,
}

impl Exception {
    pub fn single(amount: i64) -> Self {
        Self {
            kind: ExceptionKind::Single,
            amount,
        }
    }

    pub fn forever(amount: i64) -> Self {
        Self {
            kind: ExceptionKind::Forever,
            amount,
        }
    }

    pub fn skip() -> Self {
        Self {
            kind: ExceptionKind::Skip,
            amount: 0,
        }
    }
}

/// A cash flow definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Owning account
    pub account: AccountId,
    /// Base amount in minor currency units; the direction supplies the sign
    pub amount: i64,
    /// Anchor instant: the single occurrence of a one-off event, DTSTART of a
    /// recurring one. Its offset is the calendar the event repeats on unless
    /// the projection names a zone.
    pub start: OffsetTimestamp,
    /// RFC 5545 RRULE text; blank means the event happens once
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub rrule: Option<String>,
    #[serde(rename = "type")]
    pub direction: Direction,
    /// Exceptions keyed by the `YYYY-MM-DD` date of the occurrence they replace
    #[serde(default, deserialize_with = "null_as_empty")]
    pub exceptions: BTreeMap<String, Exception>,
}

impl Event {
    /// The recurrence rule text, if the event recurs at all
    pub fn recurrence(&self) -> Option<&str> {
        self.rrule
            .as_deref()
            .map(str::trim)
            .filter(|rule| !rule.is_empty())
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence().is_some()
    }
}

/// The date an exception key names, if it is exactly `YYYY-MM-DD` and a real
/// calendar date. Any other key can never match an occurrence.
pub fn parse_exception_key(key: &str) -> Option<Date> {
    let bytes = key.as_bytes();
    let shaped = bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
    if !shaped {
        return None;
    }
    key.parse().ok()
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|rule| !rule.trim().is_empty()))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, Exception>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, Exception>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_applies_sign() {
        assert_eq!(Direction::Income.apply(10, 5), 15);
        assert_eq!(Direction::Expense.apply(10, 5), 5);
        assert_eq!(Direction::Other("transfer".into()).apply(10, 5), 10);
        assert_eq!(Direction::Income.apply(i64::MAX, 1), i64::MAX);
    }

    #[test]
    fn unknown_strings_are_preserved() {
        let direction: Direction = serde_json::from_str("\"refund\"").unwrap();
        assert_eq!(direction, Direction::Other("refund".into()));
        assert_eq!(serde_json::to_string(&direction).unwrap(), "\"refund\"");

        let kind: ExceptionKind = serde_json::from_str("\"once\"").unwrap();
        assert_eq!(kind, ExceptionKind::Unknown("once".into()));
    }

    #[test]
    fn event_reads_stored_document_shape() {
        let json = r#"{
            "id": "E1",
            "name": "Rent",
            "category": "housing",
            "account": "A1",
            "amount": 120000,
            "start": "2025-01-01T00:00:00Z",
            "rrule": "",
            "type": "expense",
            "exceptions": null
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(event.rrule, None);
        assert!(!event.is_recurring());
        assert!(event.exceptions.is_empty());
        assert_eq!(event.direction, Direction::Expense);
    }

    #[test]
    fn exception_keys_must_be_plain_dates() {
        assert_eq!(
            parse_exception_key("2024-02-29"),
            Some(jiff::civil::date(2024, 2, 29))
        );
        assert_eq!(parse_exception_key("2025-02-29"), None);
        assert_eq!(parse_exception_key("2025-01-01T00:00"), None);
        assert_eq!(parse_exception_key("+2025-01-01"), None);
        assert_eq!(parse_exception_key("2025/01/01"), None);
    }

    #[test]
    fn exception_amount_defaults_to_zero() {
        let exception: Exception = serde_json::from_str(r#"{"type": "skip"}"#).unwrap();
        assert_eq!(exception, Exception::skip());
    }
}
