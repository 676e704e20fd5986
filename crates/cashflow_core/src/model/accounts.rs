//! Account definitions

use super::ids::AccountId;
use serde::{Deserialize, Serialize};

/// A named ledger that events post into.
///
/// Accounts carry no opening balance: every running total starts at zero and
/// is built purely from the occurrences that reference the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    /// Display colour chosen by the UI; the projection never reads it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Account {
    pub fn new(id: impl Into<AccountId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
        }
    }
}
