//! Split Strategies
//!
//! Turns one expense into a set of per-participant owed amounts. One tagged
//! variant per strategy, each carrying its own parameter payload - strategies
//! stay swappable without dynamic dispatch.
//!
//! # Critical Invariants
//!
//! 1. `compute_shares` is a pure function of (amount, participants, spec)
//! 2. The returned shares sum exactly to the input amount
//! 3. Output order is deterministic: participant input order for Equal,
//!    parameter order for the other strategies
//!
//! # Remainder policy
//!
//! Integer division leaves up to n-1 leftover minor units. They are
//! distributed one unit at a time to the first-listed participants, so the
//! first `remainder` entries pay one unit more than the rest. Deterministic
//! and bounded: no participant deviates by more than one unit from their
//! unrounded share.
//!
//! CRITICAL: All money values are i64 (minor units)

use crate::models::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Basis points in one whole (100%)
pub const BPS_PER_WHOLE: u64 = 10_000;

/// How an expense amount is divided among its participants
///
/// The variant name doubles as the strategy name recorded in snapshots.
///
/// # Example
/// ```
/// use splitledger_core::{compute_shares, SplitSpec};
///
/// let participants = vec!["a@x.test".to_string(), "b@x.test".to_string()];
/// let shares = compute_shares(101, &participants, &SplitSpec::Equal).unwrap();
/// assert_eq!(shares, vec![
///     ("a@x.test".to_string(), 51), // first participant absorbs the odd unit
///     ("b@x.test".to_string(), 50),
/// ]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SplitSpec {
    /// Amount divided evenly; remainder to the first participants in input order
    Equal,

    /// Explicit amount per participant; must sum exactly to the expense amount
    Exact { amounts: Vec<(String, i64)> },

    /// Percentage per participant, in basis points; must sum to exactly 10000
    Percent { percents_bps: Vec<(String, u32)> },

    /// Positive integer weight per participant; amount divided in weight ratio
    Shares { weights: Vec<(String, u32)> },
}

impl SplitSpec {
    /// Strategy name as recorded in snapshots and rendered by callers
    pub fn strategy_name(&self) -> &'static str {
        match self {
            SplitSpec::Equal => "equal",
            SplitSpec::Exact { .. } => "exact",
            SplitSpec::Percent { .. } => "percent",
            SplitSpec::Shares { .. } => "shares",
        }
    }
}

/// Compute per-participant owed amounts for an expense
///
/// Pure function: no side effects, deterministic output. The returned shares
/// always sum exactly to `amount`.
///
/// # Arguments
/// * `amount` - Expense amount in minor units (must be positive)
/// * `participants` - Non-empty, duplicate-free participant identifiers
/// * `spec` - Strategy and its parameters
///
/// # Errors
/// * [`ValidationError::NonPositiveAmount`] if `amount <= 0`
/// * [`ValidationError::NoParticipants`] / [`ValidationError::DuplicateParticipant`]
///   on a malformed participant set
/// * [`ValidationError::ParticipantMismatch`] if strategy parameters do not
///   cover exactly the participant set
/// * Strategy-specific total mismatches (exact sum, percent total, weights)
///
/// # Example
/// ```
/// use splitledger_core::{compute_shares, SplitSpec};
///
/// let participants = vec!["a@x.test".to_string(), "b@x.test".to_string()];
/// let spec = SplitSpec::Shares {
///     weights: vec![("a@x.test".to_string(), 3), ("b@x.test".to_string(), 1)],
/// };
///
/// let shares = compute_shares(10_000, &participants, &spec).unwrap();
/// assert_eq!(shares, vec![
///     ("a@x.test".to_string(), 7_500),
///     ("b@x.test".to_string(), 2_500),
/// ]);
/// ```
pub fn compute_shares(
    amount: i64,
    participants: &[String],
    spec: &SplitSpec,
) -> Result<Vec<(String, i64)>, ValidationError> {
    if amount <= 0 {
        return Err(ValidationError::NonPositiveAmount { amount });
    }
    if participants.is_empty() {
        return Err(ValidationError::NoParticipants);
    }

    let mut seen = HashSet::new();
    for participant in participants {
        if !seen.insert(participant.as_str()) {
            return Err(ValidationError::DuplicateParticipant {
                id: participant.clone(),
            });
        }
    }

    match spec {
        SplitSpec::Equal => Ok(split_equal(amount, participants)),
        SplitSpec::Exact { amounts } => split_exact(amount, participants, amounts),
        SplitSpec::Percent { percents_bps } => split_percent(amount, participants, percents_bps),
        SplitSpec::Shares { weights } => split_weighted(amount, participants, weights),
    }
}

fn split_equal(amount: i64, participants: &[String]) -> Vec<(String, i64)> {
    let n = participants.len() as i64;
    let base = amount / n;
    let remainder = amount % n;

    participants
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let extra = if (i as i64) < remainder { 1 } else { 0 };
            (p.clone(), base + extra)
        })
        .collect()
}

fn split_exact(
    amount: i64,
    participants: &[String],
    amounts: &[(String, i64)],
) -> Result<Vec<(String, i64)>, ValidationError> {
    check_coverage(participants, amounts.iter().map(|(id, _)| id))?;

    for (id, share) in amounts {
        if *share < 0 {
            return Err(ValidationError::NegativeShare {
                id: id.clone(),
                amount: *share,
            });
        }
    }

    let total: i64 = amounts.iter().map(|(_, share)| share).sum();
    if total != amount {
        return Err(ValidationError::ExactAmountMismatch {
            total,
            expected: amount,
        });
    }

    Ok(amounts.to_vec())
}

fn split_percent(
    amount: i64,
    participants: &[String],
    percents_bps: &[(String, u32)],
) -> Result<Vec<(String, i64)>, ValidationError> {
    check_coverage(participants, percents_bps.iter().map(|(id, _)| id))?;

    let total_bps: u64 = percents_bps.iter().map(|(_, bps)| u64::from(*bps)).sum();
    if total_bps != BPS_PER_WHOLE {
        return Err(ValidationError::PercentTotalMismatch { total_bps });
    }

    let numerators: Vec<(String, u64)> = percents_bps
        .iter()
        .map(|(id, bps)| (id.clone(), u64::from(*bps)))
        .collect();
    Ok(divide_in_ratio(amount, &numerators, BPS_PER_WHOLE))
}

fn split_weighted(
    amount: i64,
    participants: &[String],
    weights: &[(String, u32)],
) -> Result<Vec<(String, i64)>, ValidationError> {
    check_coverage(participants, weights.iter().map(|(id, _)| id))?;

    for (id, weight) in weights {
        if *weight == 0 {
            return Err(ValidationError::NonPositiveWeight { id: id.clone() });
        }
    }

    let total: u64 = weights.iter().map(|(_, w)| u64::from(*w)).sum();
    let numerators: Vec<(String, u64)> = weights
        .iter()
        .map(|(id, w)| (id.clone(), u64::from(*w)))
        .collect();
    Ok(divide_in_ratio(amount, &numerators, total))
}

/// Divide `amount` proportionally to `numerators / denominator`
///
/// Each entry receives `floor(amount * numerator / denominator)`; the leftover
/// minor units (strictly fewer than the number of entries) go one at a time to
/// the first-listed entries, so the total reconciles exactly.
fn divide_in_ratio(
    amount: i64,
    numerators: &[(String, u64)],
    denominator: u64,
) -> Vec<(String, i64)> {
    // i128 intermediate: amount * numerator can exceed i64 for large expenses
    let mut shares: Vec<(String, i64)> = numerators
        .iter()
        .map(|(id, num)| {
            let share = (i128::from(amount) * i128::from(*num)) / i128::from(denominator);
            (id.clone(), share as i64)
        })
        .collect();

    let distributed: i64 = shares.iter().map(|(_, s)| s).sum();
    let remainder = amount - distributed;
    debug_assert!(remainder >= 0 && (remainder as usize) < numerators.len().max(1));

    for entry in shares.iter_mut().take(remainder as usize) {
        entry.1 += 1;
    }

    shares
}

/// Verify strategy parameter keys cover exactly the participant set
fn check_coverage<'a>(
    participants: &[String],
    keys: impl Iterator<Item = &'a String>,
) -> Result<(), ValidationError> {
    let participant_set: HashSet<&str> = participants.iter().map(String::as_str).collect();
    let mut key_set: HashSet<&str> = HashSet::new();

    let mut unexpected = Vec::new();
    for key in keys {
        if !key_set.insert(key.as_str()) {
            return Err(ValidationError::DuplicateParticipant { id: key.clone() });
        }
        if !participant_set.contains(key.as_str()) {
            unexpected.push(key.clone());
        }
    }

    let mut missing: Vec<String> = participant_set
        .iter()
        .filter(|p| !key_set.contains(*p))
        .map(|p| p.to_string())
        .collect();

    if missing.is_empty() && unexpected.is_empty() {
        return Ok(());
    }

    missing.sort();
    unexpected.sort();
    Err(ValidationError::ParticipantMismatch {
        missing,
        unexpected,
    })
}
