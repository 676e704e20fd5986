//! Projection configuration
//!
//! `ProjectionConfig` says how far ahead recurring events are expanded and,
//! optionally, one time zone to read every rule and exception date in. Without
//! one each event is read on the offset its anchor was written with.
//! Everything else a projection needs comes from the `Snapshot`.
//!
//! # Builder DSL
//!
//! Snapshots for tests, benches and examples are easiest to assemble with the
//! builder DSL:
//!
//! ```ignore
//! use cashflow_core::config::{EventBuilder, SnapshotBuilder};
//!
//! let snapshot = SnapshotBuilder::new()
//!     .account("Checking")
//!     .event(EventBuilder::income("Salary")
//!         .account("Checking")
//!         .amount(500_000)
//!         .starting(2025, 1, 1)
//!         .monthly())
//!     .event(EventBuilder::expense("Rent")
//!         .account("Checking")
//!         .amount(180_000)
//!         .starting(2025, 1, 3)
//!         .monthly()
//!         .forever(2026, 1, 3, 190_000))
//!     .build();
//! ```

use jiff::tz::TimeZone;
use jiff::{Span, ToSpan};

pub mod builder;
pub mod event_builder;

pub use builder::SnapshotBuilder;
pub use event_builder::{AccountRef, EventBuilder};

/// How far past `now` recurring events are expanded unless configured otherwise
pub const DEFAULT_HORIZON_YEARS: i64 = 4;

/// Upper bound accepted by `with_horizon_years`
pub const MAX_HORIZON_YEARS: i64 = 200;

#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Added to `now` (in `time_zone`, else UTC) to get the inclusive window end
    pub horizon: Span,
    /// Zone that RRULEs are expanded in and exception keys are dated in;
    /// `None` uses each event's anchor offset
    pub time_zone: Option<TimeZone>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON_YEARS.years(),
            time_zone: None,
        }
    }
}

impl ProjectionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_horizon(mut self, horizon: Span) -> Self {
        self.horizon = horizon;
        self
    }

    /// Horizon in whole years, clamped to `1..=MAX_HORIZON_YEARS`
    #[must_use]
    pub fn with_horizon_years(self, years: i64) -> Self {
        self.with_horizon(years.clamp(1, MAX_HORIZON_YEARS).years())
    }

    #[must_use]
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = Some(time_zone);
        self
    }
}
