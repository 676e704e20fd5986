//! Projection results
//!
//! Everything here is derived: produced fresh by each projection run and
//! never fed back into the snapshot.

use std::fmt;

use super::events::Direction;
use super::ids::{AccountId, EventId, OccurrenceId};
use super::time::OffsetTimestamp;
use crate::error::{ProjectionError, RuleError};
use serde::{Deserialize, Serialize, Serializer};

/// One concrete dated instance of an event with its resolved amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub id: OccurrenceId,
    #[serde(rename = "date")]
    pub at: OffsetTimestamp,
    pub amount: i64,
    pub event_id: EventId,
    pub account_id: AccountId,
    #[serde(rename = "eventType")]
    pub direction: Direction,
    pub event_name: String,
}

/// Running total of an account right after one occurrence was applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    #[serde(rename = "date")]
    pub at: OffsetTimestamp,
    pub balance: i64,
    pub account_id: AccountId,
    pub event_id: EventId,
}

/// Input the projection could not fully honour
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "kind",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum DiagnosticKind {
    /// The event's RRULE did not parse; it contributed no occurrences
    InvalidRecurrenceRule {
        rule: String,
        #[serde(serialize_with = "collect_display")]
        error: RuleError,
    },
    /// An exception with an unrecognised kind was treated as absent
    UnknownExceptionKind {
        date: String,
        #[serde(rename = "type")]
        exception_type: String,
    },
    /// An exception key that is not a `YYYY-MM-DD` date and can never match
    InvalidExceptionDate { key: String },
    /// The event's occurrences do not move any balance
    UnknownDirection { direction: String },
    /// The event's account is not in the snapshot; its occurrences have no ledger
    UnknownAccount { account_id: AccountId },
    /// A second account reused an id; only the first one gets a ledger
    DuplicateAccount { account_id: AccountId },
}

impl Diagnostic {
    pub fn for_event(event_id: &EventId, kind: DiagnosticKind) -> Self {
        Self {
            event_id: Some(event_id.clone()),
            kind,
        }
    }

    pub fn global(kind: DiagnosticKind) -> Self {
        Self {
            event_id: None,
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(event_id) = &self.event_id {
            write!(f, "event {event_id}: ")?;
        }
        match &self.kind {
            DiagnosticKind::InvalidRecurrenceRule { rule, error } => {
                write!(f, "invalid recurrence rule {rule:?}: {error}")
            }
            DiagnosticKind::UnknownExceptionKind {
                date,
                exception_type,
            } => {
                write!(
                    f,
                    "exception on {date} has unknown type {exception_type:?}, ignored"
                )
            }
            DiagnosticKind::InvalidExceptionDate { key } => {
                write!(f, "exception key {key:?} is not a YYYY-MM-DD date")
            }
            DiagnosticKind::UnknownDirection { direction } => {
                write!(f, "unknown type {direction:?}, balances unaffected")
            }
            DiagnosticKind::UnknownAccount { account_id } => {
                write!(f, "account {account_id} does not exist")
            }
            DiagnosticKind::DuplicateAccount { account_id } => {
                write!(f, "account id {account_id} is used more than once")
            }
        }
    }
}

fn collect_display<S: Serializer>(value: &RuleError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Complete output of one projection run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Projection {
    /// Every occurrence of every event, in timestamp order
    pub occurrences: Vec<Occurrence>,
    /// Running balances grouped by account, in snapshot account order
    pub balances: Vec<AccountBalance>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Projection {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Fail the whole projection if any event produced a diagnostic
    pub fn into_strict(self) -> Result<Self, ProjectionError> {
        if self.is_clean() {
            Ok(self)
        } else {
            Err(ProjectionError {
                diagnostics: self.diagnostics,
            })
        }
    }

    pub fn occurrences_for_event<'a>(
        &'a self,
        event_id: &'a EventId,
    ) -> impl Iterator<Item = &'a Occurrence> {
        self.occurrences
            .iter()
            .filter(move |o| &o.event_id == event_id)
    }

    pub fn balances_for_account<'a>(
        &'a self,
        account_id: &'a AccountId,
    ) -> impl Iterator<Item = &'a AccountBalance> {
        self.balances
            .iter()
            .filter(move |b| &b.account_id == account_id)
    }

    /// Balance after the last projected occurrence of an account
    pub fn final_balance(&self, account_id: &AccountId) -> Option<i64> {
        self.balances_for_account(account_id)
            .last()
            .map(|b| b.balance)
    }

    pub fn diagnostics_for_event<'a>(
        &'a self,
        event_id: &'a EventId,
    ) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.event_id.as_ref() == Some(event_id))
    }
}
