//! Running balances per account

use rustc_hash::{FxHashMap, FxHashSet};

use crate::model::{Account, AccountBalance, AccountId, Diagnostic, DiagnosticKind, Occurrence};

/// Ledgers of every account, grouped by account in `accounts` order.
///
/// `ordered` must already be sequenced; each account sees its own occurrences
/// in that relative order. Occurrences of accounts not in `accounts` are
/// ignored here (the caller reports them). A repeated account id gets no
/// second ledger.
pub fn accumulate(
    accounts: &[Account],
    ordered: &[Occurrence],
) -> (Vec<AccountBalance>, Vec<Diagnostic>) {
    let mut by_account: FxHashMap<&AccountId, Vec<&Occurrence>> = FxHashMap::default();
    for occurrence in ordered {
        by_account
            .entry(&occurrence.account_id)
            .or_default()
            .push(occurrence);
    }

    let mut balances = Vec::with_capacity(ordered.len());
    let mut diagnostics = Vec::new();
    let mut seen: FxHashSet<&AccountId> = FxHashSet::default();

    for account in accounts {
        if !seen.insert(&account.id) {
            diagnostics.push(Diagnostic::global(DiagnosticKind::DuplicateAccount {
                account_id: account.id.clone(),
            }));
            continue;
        }
        let Some(occurrences) = by_account.remove(&account.id) else {
            continue;
        };

        let mut total = 0i64;
        for occurrence in occurrences {
            total = occurrence.direction.apply(total, occurrence.amount);
            balances.push(AccountBalance {
                at: occurrence.at,
                balance: total,
                account_id: account.id.clone(),
                event_id: occurrence.event_id.clone(),
            });
        }
    }

    (balances, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, EventId, OccurrenceId, OffsetTimestamp};

    fn occ(account: &str, direction: Direction, amount: i64, at: &str) -> Occurrence {
        let event_id = EventId::new(format!("{account}-evt"));
        let at: OffsetTimestamp = at.parse().unwrap();
        Occurrence {
            id: OccurrenceId::derive(&event_id, at.timestamp),
            at,
            amount,
            event_id,
            account_id: AccountId::new(account),
            direction,
            event_name: String::new(),
        }
    }

    #[test]
    fn income_then_expense() {
        let accounts = [Account::new("A", "Checking")];
        let ordered = [
            occ("A", Direction::Income, 100, "2025-01-01T00:00:00Z"),
            occ("A", Direction::Expense, 40, "2025-01-02T00:00:00Z"),
        ];

        let (balances, diagnostics) = accumulate(&accounts, &ordered);

        let totals: Vec<i64> = balances.iter().map(|b| b.balance).collect();
        assert_eq!(totals, vec![100, 60]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn grouped_by_account_in_account_order() {
        let accounts = [Account::new("B", "Savings"), Account::new("A", "Checking")];
        let ordered = [
            occ("A", Direction::Income, 1, "2025-01-01T00:00:00Z"),
            occ("B", Direction::Income, 2, "2025-01-02T00:00:00Z"),
            occ("A", Direction::Income, 3, "2025-01-03T00:00:00Z"),
        ];

        let (balances, _) = accumulate(&accounts, &ordered);

        let rows: Vec<(&str, i64)> = balances
            .iter()
            .map(|b| (b.account_id.as_str(), b.balance))
            .collect();
        assert_eq!(rows, vec![("B", 2), ("A", 1), ("A", 4)]);
    }

    #[test]
    fn other_direction_still_emits_row() {
        let accounts = [Account::new("A", "Checking")];
        let ordered = [
            occ("A", Direction::Income, 10, "2025-01-01T00:00:00Z"),
            occ("A", Direction::Other("transfer".into()), 99, "2025-01-02T00:00:00Z"),
        ];

        let (balances, _) = accumulate(&accounts, &ordered);

        let totals: Vec<i64> = balances.iter().map(|b| b.balance).collect();
        assert_eq!(totals, vec![10, 10]);
    }

    #[test]
    fn duplicate_account_gets_one_ledger() {
        let accounts = [
            Account::new("A", "Checking"),
            Account::new("B", "Empty"),
            Account::new("A", "Checking again"),
        ];
        let ordered = [occ("A", Direction::Income, 5, "2025-01-01T00:00:00Z")];

        let (balances, diagnostics) = accumulate(&accounts, &ordered);

        assert_eq!(balances.len(), 1);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::global(DiagnosticKind::DuplicateAccount {
                account_id: AccountId::new("A"),
            })]
        );
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let accounts = [Account::new("A", "Checking")];
        let ordered = [
            occ("A", Direction::Expense, i64::MAX, "2025-01-01T00:00:00Z"),
            occ("A", Direction::Expense, i64::MAX, "2025-01-02T00:00:00Z"),
        ];

        let (balances, _) = accumulate(&accounts, &ordered);

        assert_eq!(balances[1].balance, i64::MIN);
    }
}
