//! SplitLedger Core - Shared-Expense Engine
//!
//! Tracks shared expenses among a set of users and computes a reduced set of
//! payments that settles all debts.
//!
//! # Architecture
//!
//! - **models**: Domain types (User, Group, Expense, Settlement, Ledger)
//! - **split**: Split strategies (equal, exact, percent, shares)
//! - **balance**: Balance aggregator (entries -> net per-user balances)
//! - **settlement**: Debt simplifier (net balances -> direct payments)
//! - **snapshot**: Flat snapshot for persistence, with integrity hashing
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (minor units, e.g. cents)
//! 2. Derived split shares sum exactly to the expense amount
//! 3. Net balances over a closed user set sum to exactly zero
//! 4. Ledger entries are append-only; balances are always recomputed from the
//!    full event history

// Module declarations
pub mod balance;
pub mod models;
pub mod settlement;
pub mod snapshot;
pub mod split;

// Re-exports for convenience
pub use balance::{net_balances, verify_zero_sum, ConsistencyError};
pub use models::{
    expense::Expense,
    ledger::{Ledger, LedgerEntry},
    settlement::Settlement,
    user::{Group, User},
    ValidationError,
};
pub use settlement::{simplify, Payment};
pub use snapshot::{
    compute_snapshot_hash, restore_ledger, validate_snapshot, ExpenseSnapshot, GroupSnapshot,
    LedgerSnapshot, SettlementSnapshot, SnapshotError, UserSnapshot,
};
pub use split::{compute_shares, SplitSpec};
