//! Property tests for the aggregation and simplification invariants
//!
//! - net balances always sum to zero, whatever was recorded
//! - entry order never changes the aggregate
//! - split shares always reconcile exactly to the expense amount
//! - replaying the simplifier's suggestions settles every balance exactly,
//!   without ever overshooting either party

use proptest::prelude::*;
use splitledger_core::{
    compute_shares, net_balances, simplify, verify_zero_sum, Expense, LedgerEntry, Settlement,
    SplitSpec,
};

const NUM_USERS: usize = 5;

fn uid(i: usize) -> String {
    format!("u{}@x.test", i)
}

fn arb_entry() -> impl Strategy<Value = LedgerEntry> {
    prop_oneof![
        // Equal-split expense over a non-empty subset of the user pool
        (1i64..100_000, 0..NUM_USERS, 1u8..32).prop_map(|(amount, payer, mask)| {
            let participants: Vec<String> = (0..NUM_USERS)
                .filter(|i| mask & (1 << i) != 0)
                .map(uid)
                .collect();
            LedgerEntry::Expense(
                Expense::new(String::new(), amount, uid(payer), participants, SplitSpec::Equal)
                    .unwrap(),
            )
        }),
        // Settlement between two distinct users
        (1i64..100_000, 0..NUM_USERS, 1..NUM_USERS).prop_map(|(amount, payer, offset)| {
            let payee = (payer + offset) % NUM_USERS;
            LedgerEntry::Settlement(Settlement::new(uid(payer), uid(payee), amount).unwrap())
        }),
    ]
}

proptest! {
    #[test]
    fn net_balances_always_zero_sum(entries in prop::collection::vec(arb_entry(), 0..40)) {
        let balances = net_balances(&entries);
        prop_assert!(verify_zero_sum(&balances).is_ok());
    }

    #[test]
    fn aggregation_is_order_invariant(entries in prop::collection::vec(arb_entry(), 0..40)) {
        let mut reversed = entries.clone();
        reversed.reverse();
        prop_assert_eq!(net_balances(&entries), net_balances(&reversed));
    }

    #[test]
    fn simplify_replay_settles_exactly(entries in prop::collection::vec(arb_entry(), 0..40)) {
        let balances = net_balances(&entries);
        let payments = simplify(&balances).unwrap();

        let nonzero = balances.values().filter(|&&b| b != 0).count();
        prop_assert!(payments.len() <= nonzero.saturating_sub(1));

        let mut remaining = balances.clone();
        for payment in &payments {
            prop_assert!(payment.amount > 0);
            // Never larger than either party's outstanding position
            prop_assert!(payment.amount <= -remaining[&payment.debtor]);
            prop_assert!(payment.amount <= remaining[&payment.creditor]);

            *remaining.get_mut(&payment.debtor).unwrap() += payment.amount;
            *remaining.get_mut(&payment.creditor).unwrap() -= payment.amount;
        }
        prop_assert!(remaining.values().all(|&b| b == 0));
    }

    #[test]
    fn equal_split_reconciles_and_stays_fair(
        amount in 1i64..10_000_000,
        n in 1usize..9,
    ) {
        let participants: Vec<String> = (0..n).map(uid).collect();
        let shares = compute_shares(amount, &participants, &SplitSpec::Equal).unwrap();

        prop_assert_eq!(shares.iter().map(|(_, s)| *s).sum::<i64>(), amount);

        // No participant deviates by more than one minor unit from another
        let min = shares.iter().map(|(_, s)| *s).min().unwrap();
        let max = shares.iter().map(|(_, s)| *s).max().unwrap();
        prop_assert!(max - min <= 1);
    }

    #[test]
    fn weighted_split_reconciles(
        amount in 1i64..10_000_000,
        weights in prop::collection::vec(1u32..1_000, 1..8),
    ) {
        let participants: Vec<String> = (0..weights.len()).map(uid).collect();
        let spec = SplitSpec::Shares {
            weights: participants.iter().cloned().zip(weights).collect(),
        };

        let shares = compute_shares(amount, &participants, &spec).unwrap();
        prop_assert_eq!(shares.iter().map(|(_, s)| *s).sum::<i64>(), amount);
    }

    #[test]
    fn percent_split_reconciles(
        amount in 1i64..10_000_000,
        cuts in prop::collection::vec(1u32..1_000, 1..8),
    ) {
        // Normalize arbitrary cuts into basis points summing to exactly 10000
        let total: u64 = cuts.iter().map(|c| u64::from(*c)).sum();
        let mut bps: Vec<u32> = cuts
            .iter()
            .map(|c| (10_000u64 * u64::from(*c) / total) as u32)
            .collect();
        let assigned: u32 = bps.iter().sum();
        bps[0] += 10_000 - assigned;

        let participants: Vec<String> = (0..bps.len()).map(uid).collect();
        let spec = SplitSpec::Percent {
            percents_bps: participants.iter().cloned().zip(bps).collect(),
        };

        let shares = compute_shares(amount, &participants, &spec).unwrap();
        prop_assert_eq!(shares.iter().map(|(_, s)| *s).sum::<i64>(), amount);
    }
}
