//! Occurrence expansion - one event at a time
//!
//! Turns an event's anchor, recurrence rule and exceptions into concrete
//! dated occurrences inside the projection window. Rules repeat on the
//! calendar of the anchor's own offset unless the window names a zone, and
//! exceptions are looked up by the date of each instant on that same
//! calendar. A `forever` exception changes the carried amount for every later
//! instant, a `single` one only its own.

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::model::{
    Diagnostic, DiagnosticKind, Event, ExceptionKind, Occurrence, OccurrenceId, OffsetTimestamp,
    parse_exception_key,
};
use crate::rrule::RecurrenceRule;

/// Where recurring events stop and which zone their rules are read in
#[derive(Debug, Clone)]
pub struct Window {
    /// `None` reads each event on its anchor's offset
    pub time_zone: Option<TimeZone>,
    /// Inclusive upper bound for recurring instances
    pub end: Timestamp,
}

/// Occurrences of a single event, ascending, plus what could not be honoured
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    pub occurrences: Vec<Occurrence>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn expand_event(event: &Event, window: &Window) -> Expansion {
    let mut expansion = Expansion::default();
    let tz = match &window.time_zone {
        Some(tz) => tz.clone(),
        None => event.start.time_zone(),
    };

    let Some(rule_text) = event.recurrence() else {
        // One-off events ignore both the window and exceptions
        let at = OffsetTimestamp::in_zone(event.start.timestamp, &tz);
        expansion
            .occurrences
            .push(occurrence(event, at, event.amount));
        return expansion;
    };

    let rule: RecurrenceRule = match rule_text.parse() {
        Ok(rule) => rule,
        Err(error) => {
            tracing::warn!(event = %event.id, rule = rule_text, %error, "dropping event with invalid recurrence rule");
            expansion.diagnostics.push(Diagnostic::for_event(
                &event.id,
                DiagnosticKind::InvalidRecurrenceRule {
                    rule: rule_text.to_string(),
                    error,
                },
            ));
            return expansion;
        }
    };

    for key in event.exceptions.keys() {
        if parse_exception_key(key).is_none() {
            tracing::warn!(event = %event.id, key = key.as_str(), "exception key is not a date");
            expansion.diagnostics.push(Diagnostic::for_event(
                &event.id,
                DiagnosticKind::InvalidExceptionDate { key: key.clone() },
            ));
        }
    }

    let mut instants: Vec<Timestamp> = rule
        .instances(
            tz.to_datetime(event.start.timestamp),
            tz.to_datetime(window.end),
            &tz,
        )
        .filter_map(|dt| tz.to_timestamp(dt).ok())
        .collect();
    // Civil instants are ascending, but a DST transition can fold two of them together
    if !instants.is_sorted() {
        instants.sort_unstable();
    }
    instants.dedup();

    let mut carried = event.amount;
    for instant in instants {
        let at = OffsetTimestamp::in_zone(instant, &tz);
        let key = at.datetime().date().to_string();
        let Some(exception) = event.exceptions.get(&key) else {
            expansion.occurrences.push(occurrence(event, at, carried));
            continue;
        };
        match &exception.kind {
            ExceptionKind::Single => {
                expansion
                    .occurrences
                    .push(occurrence(event, at, exception.amount));
            }
            ExceptionKind::Forever => {
                carried = exception.amount;
                expansion.occurrences.push(occurrence(event, at, carried));
            }
            ExceptionKind::Skip => {}
            ExceptionKind::Unknown(kind) => {
                tracing::warn!(event = %event.id, date = key.as_str(), kind = kind.as_str(), "ignoring exception of unknown type");
                expansion.occurrences.push(occurrence(event, at, carried));
                expansion.diagnostics.push(Diagnostic::for_event(
                    &event.id,
                    DiagnosticKind::UnknownExceptionKind {
                        date: key,
                        exception_type: kind.clone(),
                    },
                ));
            }
        }
    }

    expansion
}

fn occurrence(event: &Event, at: OffsetTimestamp, amount: i64) -> Occurrence {
    Occurrence {
        id: OccurrenceId::derive(&event.id, at.timestamp),
        at,
        amount,
        event_id: event.id.clone(),
        account_id: event.account.clone(),
        direction: event.direction.clone(),
        event_name: event.name.clone(),
    }
}
