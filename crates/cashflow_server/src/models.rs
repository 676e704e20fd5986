use std::collections::BTreeMap;

use cashflow_core::model::{
    Account, AccountBalance, AccountId, Diagnostic, Direction, Event, EventId, Exception,
    Occurrence, OffsetTimestamp,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// An event as the UI submits it; any `id` in the body is ignored
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub account: AccountId,
    #[serde(default)]
    pub amount: i64,
    /// RFC 3339 with the offset the user entered it in
    pub start: OffsetTimestamp,
    #[serde(default)]
    pub rrule: Option<String>,
    #[serde(rename = "type")]
    pub direction: Direction,
    #[serde(default)]
    pub exceptions: Option<BTreeMap<String, Exception>>,
}

impl CreateEventRequest {
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            name: self.name,
            category: self.category,
            account: self.account,
            amount: self.amount,
            start: self.start,
            rrule: self.rrule.filter(|rule| !rule.trim().is_empty()),
            direction: self.direction,
            exceptions: self.exceptions.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateQuery {
    pub horizon_years: Option<i64>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Full projection plus its inputs, in the shape the UI has always read
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    #[serde(rename = "eventOccurances")]
    pub event_occurrences: Vec<Occurrence>,
    pub account_balances: Vec<AccountBalance>,
    pub events: Vec<Event>,
    pub accounts: Vec<Account>,
    pub diagnostics: Vec<Diagnostic>,
}

/// One entry of a FullCalendar event feed
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: OffsetTimestamp,
    pub end: OffsetTimestamp,
    pub all_day: bool,
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub extended_props: CalendarProps,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarProps {
    pub amount: i64,
    pub event_id: EventId,
    pub account_id: AccountId,
    pub category: String,
}
