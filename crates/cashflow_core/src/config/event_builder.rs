//! Event Builder DSL
//!
//! Provides a fluent API for describing income and expense events.
//!
//! # Examples
//!
//! ```ignore
//! use cashflow_core::config::EventBuilder;
//!
//! // Paid on the last business day of every month
//! let salary = EventBuilder::income("Salary")
//!     .account("Checking")
//!     .amount(520_000)
//!     .starting(2025, 1, 1)
//!     .rrule("FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1");
//!
//! // Fortnightly groceries with one skipped week
//! let groceries = EventBuilder::expense("Groceries")
//!     .account("Checking")
//!     .amount(15_000)
//!     .starting(2025, 1, 4)
//!     .biweekly()
//!     .skip(2025, 8, 16);
//! ```

use std::collections::BTreeMap;

use crate::model::{AccountId, Direction, Exception, OffsetTimestamp};
use crate::rrule::{Frequency, RecurrenceRule, Until, WeekdayRule};
use jiff::civil::{Date, DateTime, Weekday};

/// Builder for creating events with a fluent API
#[derive(Debug, Clone)]
pub struct EventBuilder {
    pub(crate) name: String,
    pub(crate) category: String,
    pub(crate) direction: Direction,
    pub(crate) account: AccountRef,
    pub(crate) amount: i64,
    pub(crate) start: StartSpec,
    pub(crate) rule: Option<RuleSpec>,
    pub(crate) exceptions: BTreeMap<String, Exception>,
}

/// Reference to an account - can be by ID or by name (resolved later)
#[derive(Debug, Clone)]
pub enum AccountRef {
    Id(AccountId),
    Name(String),
}

/// Anchor of the event, resolved to an instant when the snapshot is built
#[derive(Debug, Clone, Copy)]
pub(crate) enum StartSpec {
    /// Wall-clock time in the snapshot builder's zone
    Civil(DateTime),
    Instant(OffsetTimestamp),
}

#[derive(Debug, Clone)]
pub(crate) enum RuleSpec {
    Rule(RecurrenceRule),
    /// Stored verbatim, including text that does not parse
    Text(String),
}

impl RuleSpec {
    pub(crate) fn render(&self) -> String {
        match self {
            RuleSpec::Rule(rule) => rule.to_string(),
            RuleSpec::Text(text) => text.clone(),
        }
    }
}

impl EventBuilder {
    // =========================================================================
    // Event Type Constructors
    // =========================================================================

    /// An event with an arbitrary direction; anything other than `income` or
    /// `expense` leaves balances untouched
    pub fn new(name: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: String::new(),
            direction: Direction::from(direction.into()),
            account: AccountRef::Name("default".into()),
            amount: 0,
            start: StartSpec::Civil(jiff::civil::date(2025, 1, 1).at(0, 0, 0, 0)),
            rule: None,
            exceptions: BTreeMap::new(),
        }
    }

    /// Create an income event (salary, interest, refunds, etc.)
    pub fn income(name: impl Into<String>) -> Self {
        Self::new(name, "income")
    }

    /// Create an expense event (rent, utilities, food, etc.)
    pub fn expense(name: impl Into<String>) -> Self {
        Self::new(name, "expense")
    }

    // =========================================================================
    // Account / Amount
    // =========================================================================

    /// Post into the account with this name
    pub fn account(mut self, name: impl Into<String>) -> Self {
        self.account = AccountRef::Name(name.into());
        self
    }

    /// Post into an account by id
    pub fn account_id(mut self, id: impl Into<AccountId>) -> Self {
        self.account = AccountRef::Id(id.into());
        self
    }

    /// Base amount in minor units
    pub fn amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    // =========================================================================
    // Timing
    // =========================================================================

    /// Start at midnight on this date
    pub fn starting(self, year: i16, month: i8, day: i8) -> Self {
        self.starting_on(jiff::civil::date(year, month, day))
    }

    pub fn starting_on(mut self, date: Date) -> Self {
        self.start = StartSpec::Civil(date.to_datetime(jiff::civil::Time::midnight()));
        self
    }

    pub fn starting_at(mut self, at: DateTime) -> Self {
        self.start = StartSpec::Civil(at);
        self
    }

    /// Start at an exact instant, independent of the builder's zone
    pub fn starting_instant(mut self, at: impl Into<OffsetTimestamp>) -> Self {
        self.start = StartSpec::Instant(at.into());
        self
    }

    /// Happens only at its start (the default)
    pub fn once(mut self) -> Self {
        self.rule = None;
        self
    }

    // =========================================================================
    // Repeating Schedules
    // =========================================================================

    /// Event repeats daily
    pub fn daily(self) -> Self {
        self.repeating(Frequency::Daily, 1)
    }

    /// Event repeats weekly
    pub fn weekly(self) -> Self {
        self.repeating(Frequency::Weekly, 1)
    }

    /// Event repeats bi-weekly
    pub fn biweekly(self) -> Self {
        self.repeating(Frequency::Weekly, 2)
    }

    /// Event repeats monthly
    pub fn monthly(self) -> Self {
        self.repeating(Frequency::Monthly, 1)
    }

    /// Event repeats quarterly
    pub fn quarterly(self) -> Self {
        self.repeating(Frequency::Monthly, 3)
    }

    /// Event repeats yearly
    pub fn yearly(self) -> Self {
        self.repeating(Frequency::Yearly, 1)
    }

    /// Use a literal RRULE; it is stored as given, even if it does not parse
    pub fn rrule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(RuleSpec::Text(rule.into()));
        self
    }

    /// Only on these weekdays of each period
    pub fn on_weekdays(self, days: impl IntoIterator<Item = Weekday>) -> Self {
        let days: Vec<_> = days.into_iter().map(WeekdayRule::every).collect();
        self.map_rule(|rule| rule.by_day(days))
    }

    /// Only on these days of the month; negative values count from the end
    pub fn on_month_days(self, days: impl IntoIterator<Item = i8>) -> Self {
        let days: Vec<_> = days.into_iter().collect();
        self.map_rule(|rule| rule.by_month_day(days))
    }

    /// Stop repeating after N occurrences
    pub fn max_occurrences(self, count: u32) -> Self {
        self.map_rule(|rule| rule.count(count))
    }

    /// Stop repeating after this date (inclusive, midnight)
    pub fn until_date(self, date: Date) -> Self {
        let until = Until::Floating(date.to_datetime(jiff::civil::Time::midnight()));
        self.map_rule(|rule| rule.until(until))
    }

    fn repeating(mut self, frequency: Frequency, interval: u32) -> Self {
        self.rule = Some(RuleSpec::Rule(
            RecurrenceRule::new(frequency).interval(interval),
        ));
        self
    }

    /// Refine a structured rule; a literal or absent rule is left alone
    fn map_rule(mut self, f: impl FnOnce(RecurrenceRule) -> RecurrenceRule) -> Self {
        self.rule = match self.rule.take() {
            Some(RuleSpec::Rule(rule)) => Some(RuleSpec::Rule(f(rule))),
            other => other,
        };
        self
    }

    // =========================================================================
    // Exceptions
    // =========================================================================

    /// Attach an exception to the occurrence on `date`
    pub fn exception_on(mut self, date: Date, exception: Exception) -> Self {
        self.exceptions.insert(date.to_string(), exception);
        self
    }

    /// Attach an exception under a raw key, which need not be a valid date
    pub fn exception_key(mut self, key: impl Into<String>, exception: Exception) -> Self {
        self.exceptions.insert(key.into(), exception);
        self
    }

    /// Override only the occurrence on this date
    pub fn single(self, year: i16, month: i8, day: i8, amount: i64) -> Self {
        self.exception_on(jiff::civil::date(year, month, day), Exception::single(amount))
    }

    /// Change the amount from this date onwards
    pub fn forever(self, year: i16, month: i8, day: i8, amount: i64) -> Self {
        self.exception_on(
            jiff::civil::date(year, month, day),
            Exception::forever(amount),
        )
    }

    /// Drop the occurrence on this date
    pub fn skip(self, year: i16, month: i8, day: i8) -> Self {
        self.exception_on(jiff::civil::date(year, month, day), Exception::skip())
    }
}
