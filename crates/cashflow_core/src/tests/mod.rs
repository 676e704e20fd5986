//! Integration tests for the cashflow projection engine
//!
//! Tests are organized by topic:
//! - `expansion` - Recurrence expansion inside the projection window
//! - `exceptions` - Single, forever and skip overrides
//! - `balances` - Running balances and account handling
//! - `projection` - Ordering, purity, diagnostics and the wire shape
//! - `builder_dsl` - Builder DSL for fluent snapshot setup

mod builder_dsl;

use crate::config::ProjectionConfig;
use jiff::Timestamp;

/// Fixed clock shared by the topic modules
fn now() -> Timestamp {
    "2025-01-01T00:00:00Z".parse().unwrap()
}

fn config() -> ProjectionConfig {
    ProjectionConfig::default()
}
