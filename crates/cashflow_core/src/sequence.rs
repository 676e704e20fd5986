//! Global ordering of occurrences across events

use crate::model::Occurrence;

/// Merge per-event sequences into one timeline.
///
/// Ordered by instant, then event id, then occurrence id, so the result does
/// not depend on the order events were supplied in. The offset an instant is
/// written in plays no part.
pub fn sequence(per_event: impl IntoIterator<Item = Vec<Occurrence>>) -> Vec<Occurrence> {
    let mut all: Vec<Occurrence> = per_event.into_iter().flatten().collect();
    all.sort_by(|a, b| {
        a.at.timestamp
            .cmp(&b.at.timestamp)
            .then_with(|| a.event_id.cmp(&b.event_id))
            .then_with(|| a.id.cmp(&b.id))
    });
    all
}
