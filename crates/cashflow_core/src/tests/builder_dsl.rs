//! Tests for the Builder DSL
//!
//! These tests demonstrate and verify the fluent builder API for creating snapshots.

use super::{config, now};
use crate::config::{EventBuilder, SnapshotBuilder};
use crate::model::{AccountId, Direction, Exception, ExceptionKind, Snapshot};

/// Test basic SnapshotBuilder usage
#[test]
fn test_snapshot_builder_basic() {
    let snapshot = SnapshotBuilder::new().build();

    assert!(snapshot.accounts.is_empty());
    assert!(snapshot.events.is_empty());
    assert!(snapshot.project(&config(), now()).is_clean());
}

/// Test the fields a built event carries
#[test]
fn test_event_fields() {
    let snapshot = SnapshotBuilder::new()
        .account_colored("Checking", "#264653")
        .event(
            EventBuilder::expense("Rent")
                .category("housing")
                .account("Checking")
                .amount(180_000)
                .starting(2025, 2, 1)
                .monthly()
                .forever(2026, 2, 1, 190_000),
        )
        .build();

    assert_eq!(snapshot.accounts[0].color.as_deref(), Some("#264653"));

    let rent = &snapshot.events[0];
    assert_eq!(rent.name, "Rent");
    assert_eq!(rent.category, "housing");
    assert_eq!(rent.account, AccountId::new("acct-0"));
    assert_eq!(rent.amount, 180_000);
    assert_eq!(rent.direction, Direction::Expense);
    assert_eq!(rent.rrule.as_deref(), Some("FREQ=MONTHLY"));
    assert_eq!(
        rent.exceptions.get("2026-02-01"),
        Some(&Exception {
            kind: ExceptionKind::Forever,
            amount: 190_000
        })
    );
}

/// Built snapshots round-trip through the stored JSON document
#[test]
fn test_snapshot_serializes_as_store_document() {
    let snapshot = SnapshotBuilder::new()
        .account("Checking")
        .event(
            EventBuilder::income("Pay")
                .account("Checking")
                .amount(1)
                .starting(2025, 1, 1)
                .weekly()
                .skip(2025, 1, 8),
        )
        .event(
            EventBuilder::income("Once")
                .account("Checking")
                .amount(2),
        )
        .build();

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["events"][0]["type"], "income");
    assert_eq!(json["events"][0]["exceptions"]["2025-01-08"]["type"], "skip");
    assert!(json["events"][1].get("rrule").is_none());

    let back: Snapshot = serde_json::from_value(json).unwrap();
    assert_eq!(back, snapshot);
}

/// A full household plan projected through the builder
#[test]
fn test_builder_household_plan() {
    let snapshot = SnapshotBuilder::new()
        .account("Checking")
        .event(
            EventBuilder::income("Salary")
                .account("Checking")
                .amount(3_000)
                .starting(2025, 1, 1)
                .monthly()
                .max_occurrences(12),
        )
        .event(
            EventBuilder::expense("Rent")
                .account("Checking")
                .amount(1_000)
                .starting(2025, 1, 2)
                .monthly()
                .max_occurrences(12)
                .single(2025, 7, 2, 0),
        )
        .event(
            EventBuilder::expense("Insurance")
                .account("Checking")
                .amount(600)
                .starting(2025, 1, 3)
                .quarterly()
                .max_occurrences(4),
        )
        .build();

    let projection = snapshot.project(&config(), now());

    assert_eq!(projection.occurrences.len(), 28);
    // 12 * 3000 - 11 * 1000 - 4 * 600
    assert_eq!(
        projection.final_balance(&AccountId::new("acct-0")),
        Some(22_600)
    );
}
