//! Domain models for the shared-expense ledger

pub mod expense;
pub mod ledger;
pub mod settlement;
pub mod user;

use thiserror::Error;

// Re-exports
pub use expense::Expense;
pub use ledger::{Ledger, LedgerEntry};
pub use settlement::Settlement;
pub use user::{Group, User};

/// Errors raised when constructing or recording domain objects
///
/// All validation is fail-fast: an Expense or Settlement that would violate
/// these rules is rejected at construction time and never reaches the ledger.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Amount must be positive, got {amount}")]
    NonPositiveAmount { amount: i64 },

    #[error("Expense has no participants")]
    NoParticipants,

    #[error("Duplicate participant: {id}")]
    DuplicateParticipant { id: String },

    #[error("Split parameters do not cover the participant set (missing: {missing:?}, unexpected: {unexpected:?})")]
    ParticipantMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("Exact amounts sum to {total}, expense amount is {expected}")]
    ExactAmountMismatch { total: i64, expected: i64 },

    #[error("Exact amount for {id} is negative: {amount}")]
    NegativeShare { id: String, amount: i64 },

    #[error("Percentages sum to {total_bps} basis points, expected 10000")]
    PercentTotalMismatch { total_bps: u64 },

    #[error("Share weight for {id} must be positive")]
    NonPositiveWeight { id: String },

    #[error("Settlement payer and payee are the same user: {id}")]
    SelfSettlement { id: String },

    #[error("Unknown user: {id}")]
    UnknownUser { id: String },

    #[error("User already exists: {id}")]
    DuplicateUser { id: String },

    #[error("Group already exists: {name}")]
    DuplicateGroup { name: String },

    #[error("Duplicate group member: {id}")]
    DuplicateMember { id: String },

    #[error("Identifier must not be empty")]
    EmptyIdentifier,
}
