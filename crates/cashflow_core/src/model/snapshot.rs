//! The projection input

use super::accounts::Account;
use super::events::Event;
use super::ids::{AccountId, EventId};
use serde::{Deserialize, Serialize};

/// Accounts and events as they stood at one moment
///
/// This is also the document the store persists, so unknown fields from the
/// file are tolerated and missing lists read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Snapshot {
    pub fn new(accounts: Vec<Account>, events: Vec<Event>) -> Self {
        Self { accounts, events }
    }

    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| &a.id == id)
    }

    pub fn account_by_name(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.name == name)
    }

    pub fn event(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }
}
