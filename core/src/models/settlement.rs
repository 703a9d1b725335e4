//! Settlement record
//!
//! A direct payment that has already changed hands, reducing the payer's
//! debt to the payee. Settlements are append-only events like expenses; a
//! correction is a new entry, never a mutation.
//!
//! CRITICAL: All money values are i64 (minor units)

use crate::models::ValidationError;

/// A recorded direct payment between two users
///
/// # Example
/// ```
/// use splitledger_core::Settlement;
///
/// let settlement = Settlement::new(
///     "b@x.test".to_string(),
///     "a@x.test".to_string(),
///     3_000,
/// ).unwrap();
///
/// assert_eq!(settlement.payer(), "b@x.test");
/// assert_eq!(settlement.amount(), 3_000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    /// Unique entry identifier (UUID)
    id: String,

    /// User who handed over the money
    payer: String,

    /// User who received it
    payee: String,

    /// Amount paid (i64 minor units)
    amount: i64,
}

impl Settlement {
    /// Create a new settlement record
    ///
    /// # Errors
    /// * [`ValidationError::NonPositiveAmount`] if `amount <= 0`
    /// * [`ValidationError::SelfSettlement`] if payer and payee are the same
    /// * [`ValidationError::EmptyIdentifier`] on blank identifiers
    pub fn new(payer: String, payee: String, amount: i64) -> Result<Self, ValidationError> {
        if payer.trim().is_empty() || payee.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }
        if amount <= 0 {
            return Err(ValidationError::NonPositiveAmount { amount });
        }
        if payer == payee {
            return Err(ValidationError::SelfSettlement { id: payer });
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            payer,
            payee,
            amount,
        })
    }

    /// Restore a settlement from a persisted snapshot, preserving its id
    pub fn from_snapshot(id: String, payer: String, payee: String, amount: i64) -> Self {
        Self {
            id,
            payer,
            payee,
            amount,
        }
    }

    /// Get entry ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get payer identifier
    pub fn payer(&self) -> &str {
        &self.payer
    }

    /// Get payee identifier
    pub fn payee(&self) -> &str {
        &self.payee
    }

    /// Get amount (i64 minor units)
    pub fn amount(&self) -> i64 {
        self.amount
    }
}
