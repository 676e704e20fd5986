//! Cash-flow projection library
//!
//! This crate projects recurring and one-off income and expense events into
//! concrete dated occurrences and running per-account balances. It supports:
//! - RFC 5545 recurrence rules (yearly, monthly, weekly, daily; `BYDAY`
//!   ordinals, `BYSETPOS`, `COUNT`/`UNTIL`)
//! - Per-date exceptions that override one occurrence, change the amount
//!   from a date onwards, or skip an occurrence
//! - A deterministic global timeline and per-account running balances
//! - Diagnostics instead of failures for input that cannot be fully honoured
//!
//! The projection is a pure function of a `Snapshot`, a `ProjectionConfig`
//! and the caller's `now`; it does no I/O.
//!
//! # Builder DSL
//!
//! Use the fluent builder API for ergonomic snapshot setup:
//!
//! ```ignore
//! use cashflow_core::config::{EventBuilder, ProjectionConfig, SnapshotBuilder};
//!
//! let snapshot = SnapshotBuilder::new()
//!     .account("Checking")
//!     .event(EventBuilder::income("Salary")
//!         .account("Checking")
//!         .amount(800_000)
//!         .starting(2025, 1, 1)
//!         .monthly())
//!     .build();
//!
//! let projection = snapshot.project(&ProjectionConfig::default(), jiff::Timestamp::now());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod balance;
pub mod date_math;
pub mod error;
pub mod expand;
pub mod projection;
pub mod rrule;
pub mod sequence;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{DEFAULT_HORIZON_YEARS, EventBuilder, ProjectionConfig, SnapshotBuilder};
pub use error::{ProjectionError, RuleError};
pub use model::{
    Account, AccountBalance, AccountId, Diagnostic, DiagnosticKind, Direction, Event, EventId,
    Exception, ExceptionKind, Occurrence, OccurrenceId, OffsetTimestamp, Projection, Snapshot,
};
pub use projection::project;
pub use rrule::RecurrenceRule;
