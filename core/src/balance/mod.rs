//! Balance Aggregator
//!
//! Folds an ordered sequence of expenses and settlements into a net balance
//! per user: positive means the user is owed money, negative means they owe.
//!
//! # Critical Invariants
//!
//! 1. **Zero-sum**: over a closed user set, balances sum to exactly zero
//! 2. **Commutativity**: the fold is pure addition, so entry order never
//!    affects the result
//! 3. **No caching**: the fold always runs over the full entry history
//!
//! CRITICAL: All money values are i64 (minor units)

use crate::models::ledger::LedgerEntry;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised when an aggregation invariant is violated
///
/// A consistency error indicates a defect in the recording logic upstream.
/// It is fatal and never silently corrected.
#[derive(Debug, Error, PartialEq)]
pub enum ConsistencyError {
    #[error("Net balances sum to {total}, expected 0")]
    NonZeroSum { total: i64 },
}

/// Fold ledger entries into net per-user balances
///
/// For each expense, every participant other than the payer owes the payer
/// their derived share; the payer's own share cancels out. For each
/// settlement, the payer's position improves by the amount and the payee's
/// worsens by the same amount.
///
/// Every user touched by any entry appears in the result, even if their net
/// position works out to zero.
///
/// # Example
/// ```
/// use splitledger_core::{net_balances, Expense, LedgerEntry, SplitSpec};
///
/// let expense = Expense::new(
///     "dinner".to_string(),
///     9_000,
///     "a@x.test".to_string(),
///     vec!["a@x.test".to_string(), "b@x.test".to_string(), "c@x.test".to_string()],
///     SplitSpec::Equal,
/// ).unwrap();
///
/// let balances = net_balances(&[LedgerEntry::Expense(expense)]);
/// assert_eq!(balances["a@x.test"], 6_000);
/// assert_eq!(balances["b@x.test"], -3_000);
/// assert_eq!(balances["c@x.test"], -3_000);
/// ```
pub fn net_balances(entries: &[LedgerEntry]) -> HashMap<String, i64> {
    let mut balances: HashMap<String, i64> = HashMap::new();

    for entry in entries {
        match entry {
            LedgerEntry::Expense(expense) => {
                // Touch the payer even if nobody else owes them anything
                balances.entry(expense.payer().to_string()).or_insert(0);

                for (participant, share) in expense.shares() {
                    if participant == expense.payer() {
                        continue; // own share nets out
                    }
                    *balances.entry(participant.clone()).or_insert(0) -= share;
                    *balances.entry(expense.payer().to_string()).or_insert(0) += share;
                }
            }
            LedgerEntry::Settlement(settlement) => {
                *balances.entry(settlement.payer().to_string()).or_insert(0) +=
                    settlement.amount();
                *balances.entry(settlement.payee().to_string()).or_insert(0) -=
                    settlement.amount();
            }
        }
    }

    balances
}

/// Verify the zero-sum invariant over a set of net balances
///
/// # Errors
/// [`ConsistencyError::NonZeroSum`] if the signed total is not exactly zero.
pub fn verify_zero_sum(balances: &HashMap<String, i64>) -> Result<(), ConsistencyError> {
    let total: i64 = balances.values().sum();
    if total != 0 {
        return Err(ConsistencyError::NonZeroSum { total });
    }
    Ok(())
}
