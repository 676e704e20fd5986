//! Identifiers for projection entities
//!
//! Ids are opaque strings minted by whoever owns the data (the store, a
//! builder, a test). Each entity type has its own newtype so account, event
//! and occurrence ids cannot be mixed up.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Unique identifier for an Account
    AccountId
);

string_id!(
    /// Unique identifier for an Event
    EventId
);

string_id!(
    /// Identifier of one projected occurrence, derived from its event and instant
    OccurrenceId
);

impl OccurrenceId {
    /// Same event + same instant always yields the same id, so clients can
    /// diff successive projections.
    pub fn derive(event_id: &EventId, at: Timestamp) -> Self {
        Self(format!("{event_id}-{at}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occurrence_id_is_stable_for_event_and_instant() {
        let at: Timestamp = "2025-03-01T09:30:00Z".parse().unwrap();
        let event = EventId::new("rent");

        let a = OccurrenceId::derive(&event, at);
        let b = OccurrenceId::derive(&event, at);

        assert_eq!(a, b);
        assert_eq!(a.as_str(), "rent-2025-03-01T09:30:00Z");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&AccountId::new("A1")).unwrap();
        assert_eq!(json, "\"A1\"");
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AccountId::from("A1"));
    }
}
