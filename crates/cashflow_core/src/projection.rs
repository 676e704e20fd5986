//! Projection entry point
//!
//! Expander, sequencer and accumulator run in that order over an immutable
//! snapshot. Nothing here reads a clock: `now` is an argument, so the same
//! inputs always give the same `Projection`.

use rustc_hash::FxHashSet;

use crate::balance::accumulate;
use crate::config::ProjectionConfig;
use crate::expand::{Window, expand_event};
use crate::model::{
    Account, AccountId, Diagnostic, DiagnosticKind, Event, Projection, Snapshot,
};
use crate::sequence::sequence;
use jiff::Timestamp;
use jiff::tz::TimeZone;

/// Project `events` against `accounts` from `now` out to `now + config.horizon`.
///
/// Diagnostics are listed per event in input order, followed by account-level
/// ones (duplicate ids).
pub fn project(
    accounts: &[Account],
    events: &[Event],
    config: &ProjectionConfig,
    now: Timestamp,
) -> Projection {
    let window = Window {
        time_zone: config.time_zone.clone(),
        end: window_end(config, now),
    };
    let known_accounts: FxHashSet<&AccountId> = accounts.iter().map(|a| &a.id).collect();

    let mut per_event = Vec::with_capacity(events.len());
    let mut diagnostics = Vec::new();

    for event in events {
        let expansion = expand_event(event, &window);
        diagnostics.extend(expansion.diagnostics);

        if !event.direction.is_known() {
            tracing::warn!(event = %event.id, direction = event.direction.as_str(), "event has unknown type");
            diagnostics.push(Diagnostic::for_event(
                &event.id,
                DiagnosticKind::UnknownDirection {
                    direction: event.direction.as_str().to_string(),
                },
            ));
        }
        if !known_accounts.contains(&event.account) {
            tracing::warn!(event = %event.id, account = %event.account, "event posts to a missing account");
            diagnostics.push(Diagnostic::for_event(
                &event.id,
                DiagnosticKind::UnknownAccount {
                    account_id: event.account.clone(),
                },
            ));
        }

        per_event.push(expansion.occurrences);
    }

    let occurrences = sequence(per_event);
    let (balances, account_diagnostics) = accumulate(accounts, &occurrences);
    diagnostics.extend(account_diagnostics);

    tracing::debug!(
        accounts = accounts.len(),
        events = events.len(),
        occurrences = occurrences.len(),
        balances = balances.len(),
        diagnostics = diagnostics.len(),
        window_end = %window.end,
        "projection complete"
    );

    Projection {
        occurrences,
        balances,
        diagnostics,
    }
}

/// `now + horizon` on the configured calendar (UTC when none is set); an
/// overflowing horizon means no bound
fn window_end(config: &ProjectionConfig, now: Timestamp) -> Timestamp {
    let tz = config.time_zone.clone().unwrap_or(TimeZone::UTC);
    match now.to_zoned(tz).checked_add(config.horizon)
    {
        Ok(end) => end.timestamp(),
        Err(error) => {
            tracing::warn!(%error, "horizon overflows the timestamp range, projecting to its end");
            Timestamp::MAX
        }
    }
}

impl Snapshot {
    pub fn project(&self, config: &ProjectionConfig, now: Timestamp) -> Projection {
        project(&self.accounts, &self.events, config, now)
    }
}
