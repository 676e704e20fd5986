//! FullCalendar event feed
//!
//! Every projected occurrence becomes one calendar entry, already expanded,
//! so the feed carries no recurrence rules of its own.

use cashflow_core::model::{Account, Event, Projection};
use rustc_hash::FxHashMap;

use crate::models::{CalendarEvent, CalendarProps};

pub fn calendar_feed(
    projection: &Projection,
    events: &[Event],
    accounts: &[Account],
) -> Vec<CalendarEvent> {
    let events_by_id: FxHashMap<_, _> = events.iter().map(|e| (&e.id, e)).collect();
    let colors: FxHashMap<_, _> = accounts
        .iter()
        .filter_map(|a| a.color.as_deref().map(|color| (&a.id, color)))
        .collect();

    projection
        .occurrences
        .iter()
        .filter_map(|occurrence| {
            let event = events_by_id.get(&occurrence.event_id)?;
            Some(CalendarEvent {
                id: occurrence.id.to_string(),
                title: event.name.clone(),
                start: occurrence.at,
                end: occurrence.at,
                all_day: false,
                class_name: event.direction.as_str().to_string(),
                color: colors.get(&occurrence.account_id).map(|c| c.to_string()),
                extended_props: CalendarProps {
                    amount: occurrence.amount,
                    event_id: event.id.clone(),
                    account_id: occurrence.account_id.clone(),
                    category: event.category.clone(),
                },
            })
        })
        .collect()
}
