//! Expense model
//!
//! A single recorded expense: who paid, who participated, how the amount is
//! split. The per-participant owed amounts are derived once at construction
//! and stored with the expense, so a persisted record is self-sufficient for
//! replaying the balance aggregator.
//!
//! CRITICAL: All money values are i64 (minor units)

use crate::models::ValidationError;
use crate::split::{self, SplitSpec};

/// A recorded expense event
///
/// Construction is fail-fast: the amount, participant set, and strategy
/// parameters are validated together, and the derived shares (which sum
/// exactly to the amount) are computed up front. An `Expense` that exists is
/// always internally consistent.
///
/// The payer does not have to be a participant. When they are, their own
/// share cancels out during aggregation; when they are not, the full amount
/// is owed to them.
///
/// # Example
/// ```
/// use splitledger_core::{Expense, SplitSpec};
///
/// let expense = Expense::new(
///     "dinner".to_string(),
///     9_000,
///     "a@x.test".to_string(),
///     vec!["a@x.test".to_string(), "b@x.test".to_string(), "c@x.test".to_string()],
///     SplitSpec::Equal,
/// ).unwrap();
///
/// assert_eq!(expense.share_of("b@x.test"), 3_000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// Unique entry identifier (UUID)
    id: String,

    /// Free-form description, may be empty
    description: String,

    /// Total amount paid (i64 minor units)
    amount: i64,

    /// Identifier of the user who paid
    payer: String,

    /// Participant identifiers, input order preserved
    participants: Vec<String>,

    /// Strategy and parameters the shares were derived from
    split: SplitSpec,

    /// Derived participant -> owed amount; sums exactly to `amount`
    shares: Vec<(String, i64)>,
}

impl Expense {
    /// Create a new expense, deriving the per-participant shares
    ///
    /// # Errors
    /// Any [`ValidationError`] surfaced by
    /// [`compute_shares`](crate::split::compute_shares): non-positive amount,
    /// empty or duplicated participants, or strategy parameters inconsistent
    /// with the amount or participant set.
    pub fn new(
        description: String,
        amount: i64,
        payer: String,
        participants: Vec<String>,
        split: SplitSpec,
    ) -> Result<Self, ValidationError> {
        if payer.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }
        let shares = split::compute_shares(amount, &participants, &split)?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            description,
            amount,
            payer,
            participants,
            split,
            shares,
        })
    }

    /// Restore an expense from a persisted snapshot, preserving its id and
    /// recorded shares
    ///
    /// No validation happens here; snapshot records are checked as a whole by
    /// [`validate_snapshot`](crate::snapshot::validate_snapshot) before any
    /// entry is restored.
    pub fn from_snapshot(
        id: String,
        description: String,
        amount: i64,
        payer: String,
        participants: Vec<String>,
        split: SplitSpec,
        shares: Vec<(String, i64)>,
    ) -> Self {
        Self {
            id,
            description,
            amount,
            payer,
            participants,
            split,
            shares,
        }
    }

    /// Get entry ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get total amount (i64 minor units)
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Get payer identifier
    pub fn payer(&self) -> &str {
        &self.payer
    }

    /// Get participant identifiers
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    /// Get the split strategy and its parameters
    pub fn split(&self) -> &SplitSpec {
        &self.split
    }

    /// Get derived shares (participant, owed amount)
    pub fn shares(&self) -> &[(String, i64)] {
        &self.shares
    }

    /// Owed amount for one participant; zero if they are not involved
    pub fn share_of(&self, id: &str) -> i64 {
        self.shares
            .iter()
            .find(|(participant, _)| participant == id)
            .map(|(_, share)| *share)
            .unwrap_or(0)
    }
}
