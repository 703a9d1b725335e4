//! Debt Simplifier
//!
//! Converts net balances into a short list of direct payments that settles
//! every balance to zero, collapsing chains (A→B→C becomes A→C) so nobody
//! routes money through an intermediary.
//!
//! # Algorithm
//!
//! Greedy largest-magnitude matching:
//! 1. Partition users into creditors (balance > 0) and debtors (balance < 0)
//! 2. Repeatedly pair the largest debtor with the largest creditor
//! 3. Settle `min(|debt|, credit)` between them and shrink both positions
//! 4. Drop whoever reaches zero; repeat until both sides are empty
//! 5. Ties on magnitude break by ascending user identifier, so output is
//!    reproducible
//!
//! This is a known approximation, not an exact minimum-transaction solver
//! (that assignment problem is NP-hard in general). It does guarantee:
//! termination in at most (non-zero balances - 1) payments, the zero-sum
//! invariant preserved throughout, and no payment larger than either party's
//! outstanding position.
//!
//! CRITICAL: All money values are i64 (minor units)

use crate::balance::{verify_zero_sum, ConsistencyError};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// A suggested direct payment: debtor pays creditor `amount`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    /// User who should pay
    pub debtor: String,

    /// User who should receive
    pub creditor: String,

    /// Payment amount (i64 minor units, always positive)
    pub amount: i64,
}

/// Reduce net balances to a list of direct payments
///
/// The input must satisfy the zero-sum invariant; anything else (including a
/// single non-zero balance) indicates corrupted aggregation upstream and is
/// rejected as fatal. Users with a zero balance are already settled and never
/// appear in the output.
///
/// # Errors
/// [`ConsistencyError::NonZeroSum`] if the balances do not sum to exactly
/// zero.
///
/// # Example
/// ```
/// use splitledger_core::simplify;
/// use std::collections::HashMap;
///
/// let mut balances = HashMap::new();
/// balances.insert("a@x.test".to_string(), -1_000i64);
/// balances.insert("b@x.test".to_string(), 0i64);
/// balances.insert("c@x.test".to_string(), 1_000i64);
///
/// let payments = simplify(&balances).unwrap();
/// assert_eq!(payments.len(), 1);
/// assert_eq!(payments[0].debtor, "a@x.test");
/// assert_eq!(payments[0].creditor, "c@x.test");
/// assert_eq!(payments[0].amount, 1_000);
/// ```
pub fn simplify(balances: &HashMap<String, i64>) -> Result<Vec<Payment>, ConsistencyError> {
    verify_zero_sum(balances)?;

    // Max-heaps keyed by (magnitude, Reverse(id)): the largest outstanding
    // position wins, ties go to the lexicographically smallest identifier.
    let mut debtors: BinaryHeap<(i64, Reverse<String>)> = BinaryHeap::new();
    let mut creditors: BinaryHeap<(i64, Reverse<String>)> = BinaryHeap::new();

    for (id, &balance) in balances {
        if balance < 0 {
            debtors.push((-balance, Reverse(id.clone())));
        } else if balance > 0 {
            creditors.push((balance, Reverse(id.clone())));
        }
    }

    let mut payments = Vec::new();

    loop {
        let Some((owed, Reverse(debtor))) = debtors.pop() else {
            break;
        };
        let Some((due, Reverse(creditor))) = creditors.pop() else {
            // Unreachable under the zero-sum precondition: the two sides
            // always carry equal totals and exhaust together.
            break;
        };

        let amount = owed.min(due);
        payments.push(Payment {
            debtor: debtor.clone(),
            creditor: creditor.clone(),
            amount,
        });

        // Re-insert whichever party still has an outstanding position.
        // Exactly one side shrinks to zero per round unless both match,
        // so each round retires at least one participant.
        if owed > amount {
            debtors.push((owed - amount, Reverse(debtor)));
        }
        if due > amount {
            creditors.push((due - amount, Reverse(creditor)));
        }
    }

    Ok(payments)
}
