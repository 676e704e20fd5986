//! Snapshot Builder
//!
//! The SnapshotBuilder provides a fluent API for assembling a `Snapshot`
//! with automatic ID assignment and name-based account lookups.
//!
//! # Example
//!
//! ```ignore
//! use cashflow_core::config::{EventBuilder, SnapshotBuilder};
//!
//! let snapshot = SnapshotBuilder::new()
//!     .account("Checking")
//!     .account_colored("Savings", "#2a9d8f")
//!     .event(EventBuilder::income("Salary")
//!         .account("Checking")
//!         .amount(520_000)
//!         .starting(2025, 1, 1)
//!         .monthly())
//!     .event(EventBuilder::expense("Car insurance")
//!         .account("Savings")
//!         .amount(90_000)
//!         .starting(2025, 6, 1)
//!         .yearly())
//!     .build();
//!
//! assert_eq!(snapshot.accounts[0].id.as_str(), "acct-0");
//! ```

use super::event_builder::{AccountRef, EventBuilder, StartSpec};
use crate::model::{Account, AccountId, Event, EventId, OffsetTimestamp, Snapshot};
use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;

/// Builder for creating snapshots with automatic ID assignment
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    accounts: Vec<Account>,
    pending_events: Vec<EventBuilder>,
    time_zone: TimeZone,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuilder {
    /// Create a new snapshot builder; civil start times are read as UTC
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
            pending_events: Vec::new(),
            time_zone: TimeZone::UTC,
        }
    }

    /// Zone used to turn `EventBuilder::starting*` wall-clock times into
    /// instants; the resulting anchors carry its offset
    #[must_use]
    pub fn time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Add an account; its id is `acct-N` in insertion order
    #[must_use]
    pub fn account(mut self, name: impl Into<String>) -> Self {
        let id = AccountId::new(format!("acct-{}", self.accounts.len()));
        self.accounts.push(Account::new(id, name));
        self
    }

    #[must_use]
    pub fn account_colored(self, name: impl Into<String>, color: impl Into<String>) -> Self {
        let mut builder = self.account(name);
        if let Some(account) = builder.accounts.last_mut() {
            account.color = Some(color.into());
        }
        builder
    }

    /// Add an account with a caller-chosen id
    #[must_use]
    pub fn account_with_id(mut self, id: impl Into<AccountId>, name: impl Into<String>) -> Self {
        self.accounts.push(Account::new(id, name));
        self
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Add an event using the EventBuilder; its id is `evt-N` in insertion order
    #[must_use]
    pub fn event(mut self, builder: EventBuilder) -> Self {
        self.pending_events.push(builder);
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Resolve account names and start times and produce the snapshot
    ///
    /// An account name that matches no account is used verbatim as the id,
    /// so the projection reports it as an unknown account.
    #[must_use]
    pub fn build(self) -> Snapshot {
        let events = self
            .pending_events
            .iter()
            .enumerate()
            .map(|(index, builder)| Event {
                id: EventId::new(format!("evt-{index}")),
                name: builder.name.clone(),
                category: builder.category.clone(),
                account: self.resolve_account(&builder.account),
                amount: builder.amount,
                start: self.resolve_start(builder.start),
                rrule: builder.rule.as_ref().map(|rule| rule.render()),
                direction: builder.direction.clone(),
                exceptions: builder.exceptions.clone(),
            })
            .collect();

        Snapshot::new(self.accounts, events)
    }

    fn resolve_account(&self, account: &AccountRef) -> AccountId {
        match account {
            AccountRef::Id(id) => id.clone(),
            AccountRef::Name(name) => self
                .accounts
                .iter()
                .find(|a| &a.name == name)
                .map(|a| a.id.clone())
                .unwrap_or_else(|| AccountId::new(name.clone())),
        }
    }

    fn resolve_start(&self, start: StartSpec) -> OffsetTimestamp {
        match start {
            StartSpec::Instant(at) => at,
            StartSpec::Civil(dt) => {
                OffsetTimestamp::in_zone(civil_to_timestamp(&self.time_zone, dt), &self.time_zone)
            }
        }
    }
}

/// Gaps resolve forward, folds to the earlier instant; dates beyond the
/// timestamp range pin to its ends
fn civil_to_timestamp(tz: &TimeZone, dt: DateTime) -> Timestamp {
    tz.to_ambiguous_timestamp(dt)
        .compatible()
        .unwrap_or(if dt.year() < 0 {
            Timestamp::MIN
        } else {
            Timestamp::MAX
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_insertion_order() {
        let snapshot = SnapshotBuilder::new()
            .account("Checking")
            .account("Savings")
            .event(EventBuilder::income("a").account("Savings"))
            .event(EventBuilder::expense("b").account("Checking"))
            .build();

        assert_eq!(snapshot.accounts[1].id, AccountId::new("acct-1"));
        assert_eq!(snapshot.events[0].id, EventId::new("evt-0"));
        assert_eq!(snapshot.events[0].account, AccountId::new("acct-1"));
        assert_eq!(snapshot.events[1].account, AccountId::new("acct-0"));
    }

    #[test]
    fn unresolved_name_is_kept_verbatim() {
        let snapshot = SnapshotBuilder::new()
            .event(EventBuilder::income("a").account("Brokerage"))
            .build();

        assert_eq!(snapshot.events[0].account, AccountId::new("Brokerage"));
    }

    #[test]
    fn civil_start_uses_builder_zone() {
        let snapshot = SnapshotBuilder::new()
            .time_zone(TimeZone::fixed(jiff::tz::offset(-5)))
            .account("Checking")
            .event(
                EventBuilder::income("a")
                    .account("Checking")
                    .starting(2025, 1, 1),
            )
            .build();

        let expected: Timestamp = "2025-01-01T05:00:00Z".parse().unwrap();
        assert_eq!(snapshot.events[0].start, expected);
        assert_eq!(snapshot.events[0].start.to_string(), "2025-01-01T00:00:00-05:00");
    }
}
