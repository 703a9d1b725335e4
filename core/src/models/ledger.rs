//! Ledger state
//!
//! The explicit ledger object every operation works against: registered
//! users, groups, and the append-only entry history. There is no process-wide
//! singleton; callers own a `Ledger` and pass it around.
//!
//! # Critical Invariants
//!
//! 1. **Referential integrity**: every identifier in an entry or group refers
//!    to a registered user
//! 2. **Append-only history**: recorded entries are never mutated; balances
//!    are always recomputed from the full history
//! 3. **Zero-sum**: net balances over the ledger's users sum to exactly zero

use crate::balance;
use crate::models::expense::Expense;
use crate::models::settlement::Settlement;
use crate::models::user::{Group, User};
use crate::models::ValidationError;
use std::collections::HashMap;

/// A single financial event in the ledger
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEntry {
    /// An expense paid by one user on behalf of several
    Expense(Expense),

    /// A direct payment that already changed hands
    Settlement(Settlement),
}

/// Complete ledger state: users, groups, and the entry history
///
/// # Example
/// ```
/// use splitledger_core::{Expense, Ledger, SplitSpec, User};
///
/// let mut ledger = Ledger::new();
/// ledger.add_user(User::new("Alice".into(), "a@x.test".into()).unwrap()).unwrap();
/// ledger.add_user(User::new("Bob".into(), "b@x.test".into()).unwrap()).unwrap();
///
/// let expense = Expense::new(
///     "lunch".into(),
///     2_000,
///     "a@x.test".into(),
///     vec!["a@x.test".into(), "b@x.test".into()],
///     SplitSpec::Equal,
/// ).unwrap();
/// ledger.record_expense(expense).unwrap();
///
/// let balances = ledger.net_balances();
/// assert_eq!(balances["a@x.test"], 1_000);
/// assert_eq!(balances["b@x.test"], -1_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    /// Registered users, indexed by identifier (lowercase email)
    users: HashMap<String, User>,

    /// Registered groups, indexed by name
    groups: HashMap<String, Group>,

    /// Append-only event history in recording order
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user
    ///
    /// # Errors
    /// [`ValidationError::DuplicateUser`] if the identifier is already taken.
    pub fn add_user(&mut self, user: User) -> Result<(), ValidationError> {
        let id = user.email().to_string();
        if self.users.contains_key(&id) {
            return Err(ValidationError::DuplicateUser { id });
        }
        self.users.insert(id, user);
        Ok(())
    }

    /// Register a group
    ///
    /// # Errors
    /// * [`ValidationError::DuplicateGroup`] if the name is already taken
    /// * [`ValidationError::UnknownUser`] if any member is not registered
    pub fn add_group(&mut self, group: Group) -> Result<(), ValidationError> {
        if self.groups.contains_key(group.name()) {
            return Err(ValidationError::DuplicateGroup {
                name: group.name().to_string(),
            });
        }
        for member in group.members() {
            self.require_user(member)?;
        }
        self.groups.insert(group.name().to_string(), group);
        Ok(())
    }

    /// Append a validated expense to the history
    ///
    /// The expense itself was validated at construction; this only checks
    /// that the payer and all participants are registered users. On error
    /// nothing is recorded.
    pub fn record_expense(&mut self, expense: Expense) -> Result<(), ValidationError> {
        self.require_user(expense.payer())?;
        for participant in expense.participants() {
            self.require_user(participant)?;
        }
        self.entries.push(LedgerEntry::Expense(expense));
        Ok(())
    }

    /// Append a validated settlement to the history
    pub fn record_settlement(&mut self, settlement: Settlement) -> Result<(), ValidationError> {
        self.require_user(settlement.payer())?;
        self.require_user(settlement.payee())?;
        self.entries.push(LedgerEntry::Settlement(settlement));
        Ok(())
    }

    /// Get a user by identifier
    pub fn get_user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    /// Get a group by name
    pub fn get_group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Get all registered users
    pub fn users(&self) -> &HashMap<String, User> {
        &self.users
    }

    /// Get all registered groups
    pub fn groups(&self) -> &HashMap<String, Group> {
        &self.groups
    }

    /// Get the entry history in recording order
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Number of registered users
    pub fn num_users(&self) -> usize {
        self.users.len()
    }

    /// Number of recorded entries
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Recompute net balances from the full entry history
    ///
    /// Positive means the user is owed money, negative means they owe.
    pub fn net_balances(&self) -> HashMap<String, i64> {
        balance::net_balances(&self.entries)
    }

    fn require_user(&self, id: &str) -> Result<(), ValidationError> {
        if self.users.contains_key(id) {
            Ok(())
        } else {
            Err(ValidationError::UnknownUser { id: id.to_string() })
        }
    }
}
