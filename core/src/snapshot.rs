//! Snapshot - Save/Load Ledger State
//!
//! Plain-data representation of a complete ledger for persistence. The store
//! owns the file format; this module owns the conversion, the integrity
//! checks, and the canonical hash.
//!
//! # Critical Invariants
//!
//! - **Self-sufficiency**: every expense record carries its strategy,
//!   parameters, and derived shares, so the balance aggregator can be
//!   replayed from the snapshot alone
//! - **Zero-sum**: a valid snapshot replays to balances summing to zero
//! - **Referential integrity**: no entry or group references an undeclared
//!   user; entry ids are unique
//! - **No cached state**: restoring always rebuilds from the entry history

use crate::models::expense::Expense;
use crate::models::ledger::{Ledger, LedgerEntry};
use crate::models::settlement::Settlement;
use crate::models::user::{Group, User};
use crate::models::ValidationError;
use crate::split::SplitSpec;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use thiserror::Error;

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete ledger snapshot
///
/// Users and groups are sorted by identifier and entries keep recording
/// order, so serializing the same ledger twice yields identical bytes (and an
/// identical integrity hash).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// All registered users
    pub users: Vec<UserSnapshot>,

    /// All registered groups
    pub groups: Vec<GroupSnapshot>,

    /// All expense records, in recording order
    pub expenses: Vec<ExpenseSnapshot>,

    /// All settlement records, in recording order
    pub settlements: Vec<SettlementSnapshot>,
}

/// User record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub name: String,
    pub email: String,
}

/// Group record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub name: String,
    pub members: Vec<String>,
}

/// Expense record, self-sufficient for replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSnapshot {
    pub id: String,
    pub description: String,
    pub amount: i64,
    pub payer: String,
    pub participants: Vec<String>,
    /// Strategy name and parameters (serde-tagged)
    pub split: SplitSpec,
    /// Derived participant -> owed amount; must sum to `amount`
    pub shares: Vec<(String, i64)>,
}

/// Settlement record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementSnapshot {
    pub id: String,
    pub payer: String,
    pub payee: String,
    pub amount: i64,
}

impl From<&Ledger> for LedgerSnapshot {
    fn from(ledger: &Ledger) -> Self {
        let mut users: Vec<UserSnapshot> = ledger
            .users()
            .values()
            .map(|u| UserSnapshot {
                name: u.name().to_string(),
                email: u.email().to_string(),
            })
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));

        let mut groups: Vec<GroupSnapshot> = ledger
            .groups()
            .values()
            .map(|g| GroupSnapshot {
                name: g.name().to_string(),
                members: g.members().to_vec(),
            })
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));

        let mut expenses = Vec::new();
        let mut settlements = Vec::new();
        for entry in ledger.entries() {
            match entry {
                LedgerEntry::Expense(e) => expenses.push(ExpenseSnapshot::from(e)),
                LedgerEntry::Settlement(s) => settlements.push(SettlementSnapshot::from(s)),
            }
        }

        LedgerSnapshot {
            users,
            groups,
            expenses,
            settlements,
        }
    }
}

impl From<&Expense> for ExpenseSnapshot {
    fn from(expense: &Expense) -> Self {
        ExpenseSnapshot {
            id: expense.id().to_string(),
            description: expense.description().to_string(),
            amount: expense.amount(),
            payer: expense.payer().to_string(),
            participants: expense.participants().to_vec(),
            split: expense.split().clone(),
            shares: expense.shares().to_vec(),
        }
    }
}

impl From<ExpenseSnapshot> for Expense {
    fn from(snapshot: ExpenseSnapshot) -> Self {
        Expense::from_snapshot(
            snapshot.id,
            snapshot.description,
            snapshot.amount,
            snapshot.payer,
            snapshot.participants,
            snapshot.split,
            snapshot.shares,
        )
    }
}

impl From<&Settlement> for SettlementSnapshot {
    fn from(settlement: &Settlement) -> Self {
        SettlementSnapshot {
            id: settlement.id().to_string(),
            payer: settlement.payer().to_string(),
            payee: settlement.payee().to_string(),
            amount: settlement.amount(),
        }
    }
}

impl From<SettlementSnapshot> for Settlement {
    fn from(snapshot: SettlementSnapshot) -> Self {
        Settlement::from_snapshot(snapshot.id, snapshot.payer, snapshot.payee, snapshot.amount)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised at the snapshot boundary
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("Snapshot integrity hash mismatch: expected {expected}, computed {computed}")]
    HashMismatch { expected: String, computed: String },

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Duplicate user in snapshot: {id}")]
    DuplicateUser { id: String },

    #[error("Duplicate entry id in snapshot: {id}")]
    DuplicateEntryId { id: String },

    #[error("Unknown user referenced by {context}: {id}")]
    UnknownUser { context: String, id: String },

    #[error("Recorded shares for expense {id} sum to {total}, amount is {expected}")]
    ShareSumMismatch {
        id: String,
        total: i64,
        expected: i64,
    },

    #[error("Invalid entry in snapshot: {0}")]
    InvalidEntry(#[from] ValidationError),
}

// ============================================================================
// Integrity Hashing
// ============================================================================

/// Compute a deterministic SHA-256 hash of a snapshot
///
/// Uses canonical JSON with recursively sorted object keys, so the hash is
/// independent of serializer map ordering. The store writes this hash next to
/// the snapshot and verifies it on load, catching truncated or hand-edited
/// files before any entry is replayed.
pub fn compute_snapshot_hash(snapshot: &LedgerSnapshot) -> Result<String, SnapshotError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(snapshot)
        .map_err(|e| SnapshotError::Serialization(format!("Snapshot serialization failed: {}", e)))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let canonical = canonicalize(value);
    let json = serde_json::to_string(&canonical)
        .map_err(|e| SnapshotError::Serialization(format!("Snapshot serialization failed: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation and Restore
// ============================================================================

/// Validate snapshot integrity before restoring
///
/// Checks:
/// - no duplicate users or entry ids
/// - every group member, expense payer/participant/share key, and settlement
///   party refers to a declared user
/// - each expense's recorded shares sum exactly to its amount
/// - settlement amounts are positive and never self-directed
pub fn validate_snapshot(snapshot: &LedgerSnapshot) -> Result<(), SnapshotError> {
    let mut user_ids: HashSet<&str> = HashSet::new();
    for user in &snapshot.users {
        if !user_ids.insert(user.email.as_str()) {
            return Err(SnapshotError::DuplicateUser {
                id: user.email.clone(),
            });
        }
    }

    for group in &snapshot.groups {
        for member in &group.members {
            if !user_ids.contains(member.as_str()) {
                return Err(SnapshotError::UnknownUser {
                    context: format!("group {}", group.name),
                    id: member.clone(),
                });
            }
        }
    }

    let mut entry_ids: HashSet<&str> = HashSet::new();

    for expense in &snapshot.expenses {
        if !entry_ids.insert(expense.id.as_str()) {
            return Err(SnapshotError::DuplicateEntryId {
                id: expense.id.clone(),
            });
        }
        if expense.amount <= 0 {
            return Err(ValidationError::NonPositiveAmount {
                amount: expense.amount,
            }
            .into());
        }

        let context = format!("expense {}", expense.id);
        for id in std::iter::once(&expense.payer)
            .chain(expense.participants.iter())
            .chain(expense.shares.iter().map(|(id, _)| id))
        {
            if !user_ids.contains(id.as_str()) {
                return Err(SnapshotError::UnknownUser {
                    context: context.clone(),
                    id: id.clone(),
                });
            }
        }

        let total: i64 = expense.shares.iter().map(|(_, share)| share).sum();
        if total != expense.amount {
            return Err(SnapshotError::ShareSumMismatch {
                id: expense.id.clone(),
                total,
                expected: expense.amount,
            });
        }
    }

    for settlement in &snapshot.settlements {
        if !entry_ids.insert(settlement.id.as_str()) {
            return Err(SnapshotError::DuplicateEntryId {
                id: settlement.id.clone(),
            });
        }
        if settlement.amount <= 0 {
            return Err(ValidationError::NonPositiveAmount {
                amount: settlement.amount,
            }
            .into());
        }
        if settlement.payer == settlement.payee {
            return Err(ValidationError::SelfSettlement {
                id: settlement.payer.clone(),
            }
            .into());
        }

        let context = format!("settlement {}", settlement.id);
        for id in [&settlement.payer, &settlement.payee] {
            if !user_ids.contains(id.as_str()) {
                return Err(SnapshotError::UnknownUser {
                    context: context.clone(),
                    id: id.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Rebuild a ledger from a snapshot
///
/// Validates the snapshot, then replays every record through the regular
/// registration and recording paths. Balances are recomputed from the entry
/// history on demand; nothing cached survives the round trip.
pub fn restore_ledger(snapshot: &LedgerSnapshot) -> Result<Ledger, SnapshotError> {
    validate_snapshot(snapshot)?;

    let mut ledger = Ledger::new();

    for user in &snapshot.users {
        ledger.add_user(User::new(user.name.clone(), user.email.clone())?)?;
    }
    for group in &snapshot.groups {
        ledger.add_group(Group::new(group.name.clone(), group.members.clone())?)?;
    }
    for expense in &snapshot.expenses {
        ledger.record_expense(Expense::from(expense.clone()))?;
    }
    for settlement in &snapshot.settlements {
        ledger.record_settlement(Settlement::from(settlement.clone()))?;
    }

    Ok(ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::SplitSpec;

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger
            .add_user(User::new("Ann".to_string(), "a@x.test".to_string()).unwrap())
            .unwrap();
        ledger
            .add_user(User::new("Bob".to_string(), "b@x.test".to_string()).unwrap())
            .unwrap();
        ledger
            .record_expense(
                Expense::new(
                    "lunch".to_string(),
                    2_400,
                    "a@x.test".to_string(),
                    vec!["a@x.test".to_string(), "b@x.test".to_string()],
                    SplitSpec::Equal,
                )
                .unwrap(),
            )
            .unwrap();
        ledger
    }

    #[test]
    fn test_snapshot_hash_deterministic() {
        let ledger = sample_ledger();
        let snapshot = LedgerSnapshot::from(&ledger);

        let hash1 = compute_snapshot_hash(&snapshot).unwrap();
        let hash2 = compute_snapshot_hash(&snapshot).unwrap();
        assert_eq!(hash1, hash2, "Same snapshot should produce same hash");
    }

    #[test]
    fn test_snapshot_hash_changes_with_content() {
        let ledger = sample_ledger();
        let snapshot = LedgerSnapshot::from(&ledger);
        let mut tampered = snapshot.clone();
        tampered.expenses[0].amount = 2_500;

        assert_ne!(
            compute_snapshot_hash(&snapshot).unwrap(),
            compute_snapshot_hash(&tampered).unwrap(),
            "Different snapshots should produce different hashes"
        );
    }

    #[test]
    fn test_validate_rejects_tampered_shares() {
        let snapshot = LedgerSnapshot::from(&sample_ledger());
        let mut tampered = snapshot;
        tampered.expenses[0].shares[0].1 += 100;

        let result = validate_snapshot(&tampered);
        assert!(matches!(
            result,
            Err(SnapshotError::ShareSumMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_payer() {
        let snapshot = LedgerSnapshot::from(&sample_ledger());
        let mut tampered = snapshot;
        tampered.expenses[0].payer = "ghost@x.test".to_string();

        let result = validate_snapshot(&tampered);
        assert!(matches!(result, Err(SnapshotError::UnknownUser { .. })));
    }
}
