//! End-to-end scenarios through the public API: record entries, aggregate,
//! simplify, and check the suggested payments.
//!
//! CRITICAL: All money values are i64 (minor units)

use splitledger_core::{
    simplify, verify_zero_sum, Expense, Ledger, Payment, Settlement, SplitSpec, User,
    ValidationError,
};

fn ledger_with_users(names: &[(&str, &str)]) -> Ledger {
    let mut ledger = Ledger::new();
    for (name, email) in names {
        ledger
            .add_user(User::new(name.to_string(), email.to_string()).unwrap())
            .unwrap();
    }
    ledger
}

fn equal_expense(amount: i64, payer: &str, participants: &[&str]) -> Expense {
    Expense::new(
        String::new(),
        amount,
        payer.to_string(),
        participants.iter().map(|p| p.to_string()).collect(),
        SplitSpec::Equal,
    )
    .unwrap()
}

fn payment(debtor: &str, creditor: &str, amount: i64) -> Payment {
    Payment {
        debtor: debtor.to_string(),
        creditor: creditor.to_string(),
        amount,
    }
}

#[test]
fn test_equal_split_three_ways() {
    // 90.00 paid by A, split equally among A, B, C:
    // B owes A 30.00 and C owes A 30.00
    let mut ledger = ledger_with_users(&[
        ("Ann", "a@x.test"),
        ("Bob", "b@x.test"),
        ("Cem", "c@x.test"),
    ]);
    ledger
        .record_expense(equal_expense(
            9_000,
            "a@x.test",
            &["a@x.test", "b@x.test", "c@x.test"],
        ))
        .unwrap();

    let balances = ledger.net_balances();
    assert_eq!(balances["a@x.test"], 6_000);
    assert_eq!(balances["b@x.test"], -3_000);
    assert_eq!(balances["c@x.test"], -3_000);
    verify_zero_sum(&balances).unwrap();

    let payments = simplify(&balances).unwrap();
    assert_eq!(
        payments,
        vec![
            payment("b@x.test", "a@x.test", 3_000),
            payment("c@x.test", "a@x.test", 3_000),
        ]
    );
}

#[test]
fn test_chain_collapses_without_intermediary() {
    // A owes B 10.00 from one expense, B owes C 10.00 from another.
    // The simplifier must route A -> C directly, never through B.
    let mut ledger = ledger_with_users(&[
        ("Ann", "a@x.test"),
        ("Bob", "b@x.test"),
        ("Cem", "c@x.test"),
    ]);
    ledger
        .record_expense(equal_expense(1_000, "b@x.test", &["a@x.test"]))
        .unwrap();
    ledger
        .record_expense(equal_expense(1_000, "c@x.test", &["b@x.test"]))
        .unwrap();

    let balances = ledger.net_balances();
    assert_eq!(balances["a@x.test"], -1_000);
    assert_eq!(balances["b@x.test"], 0);
    assert_eq!(balances["c@x.test"], 1_000);

    let payments = simplify(&balances).unwrap();
    assert_eq!(payments, vec![payment("a@x.test", "c@x.test", 1_000)]);
}

#[test]
fn test_settlement_clears_debtor() {
    // After the three-way dinner, B pays A back 30.00: B drops out and only
    // C's debt remains.
    let mut ledger = ledger_with_users(&[
        ("Ann", "a@x.test"),
        ("Bob", "b@x.test"),
        ("Cem", "c@x.test"),
    ]);
    ledger
        .record_expense(equal_expense(
            9_000,
            "a@x.test",
            &["a@x.test", "b@x.test", "c@x.test"],
        ))
        .unwrap();
    ledger
        .record_settlement(
            Settlement::new("b@x.test".to_string(), "a@x.test".to_string(), 3_000).unwrap(),
        )
        .unwrap();

    let balances = ledger.net_balances();
    assert_eq!(balances["b@x.test"], 0);

    let payments = simplify(&balances).unwrap();
    assert_eq!(payments, vec![payment("c@x.test", "a@x.test", 3_000)]);
}

#[test]
fn test_exact_split_total_mismatch_rejected() {
    // 100.00 split as [40.00, 61.00] must fail fast with a validation error
    let result = Expense::new(
        "hotel".to_string(),
        10_000,
        "a@x.test".to_string(),
        vec!["a@x.test".to_string(), "b@x.test".to_string()],
        SplitSpec::Exact {
            amounts: vec![
                ("a@x.test".to_string(), 4_000),
                ("b@x.test".to_string(), 6_100),
            ],
        },
    );

    assert_eq!(
        result,
        Err(ValidationError::ExactAmountMismatch {
            total: 10_100,
            expected: 10_000
        })
    );
}

#[test]
fn test_mixed_strategies_keep_zero_sum() {
    let mut ledger = ledger_with_users(&[
        ("Ann", "a@x.test"),
        ("Bob", "b@x.test"),
        ("Cem", "c@x.test"),
    ]);

    ledger
        .record_expense(equal_expense(
            10_000,
            "a@x.test",
            &["a@x.test", "b@x.test", "c@x.test"],
        ))
        .unwrap();
    ledger
        .record_expense(
            Expense::new(
                "drinks".to_string(),
                3_000,
                "b@x.test".to_string(),
                vec!["a@x.test".to_string(), "c@x.test".to_string()],
                SplitSpec::Percent {
                    percents_bps: vec![
                        ("a@x.test".to_string(), 2_500),
                        ("c@x.test".to_string(), 7_500),
                    ],
                },
            )
            .unwrap(),
        )
        .unwrap();
    ledger
        .record_expense(
            Expense::new(
                "fuel".to_string(),
                4_500,
                "c@x.test".to_string(),
                vec!["a@x.test".to_string(), "b@x.test".to_string(), "c@x.test".to_string()],
                SplitSpec::Shares {
                    weights: vec![
                        ("a@x.test".to_string(), 2),
                        ("b@x.test".to_string(), 2),
                        ("c@x.test".to_string(), 1),
                    ],
                },
            )
            .unwrap(),
        )
        .unwrap();

    let balances = ledger.net_balances();
    verify_zero_sum(&balances).unwrap();

    // Replaying the suggestions settles everyone exactly
    let mut remaining = balances.clone();
    for p in simplify(&balances).unwrap() {
        *remaining.get_mut(&p.debtor).unwrap() += p.amount;
        *remaining.get_mut(&p.creditor).unwrap() -= p.amount;
    }
    assert!(remaining.values().all(|&b| b == 0));
}

#[test]
fn test_corrections_are_new_entries() {
    // A mistaken settlement is corrected by recording the reverse payment,
    // not by mutating history.
    let mut ledger = ledger_with_users(&[("Ann", "a@x.test"), ("Bob", "b@x.test")]);
    ledger
        .record_settlement(
            Settlement::new("a@x.test".to_string(), "b@x.test".to_string(), 500).unwrap(),
        )
        .unwrap();
    ledger
        .record_settlement(
            Settlement::new("b@x.test".to_string(), "a@x.test".to_string(), 500).unwrap(),
        )
        .unwrap();

    assert_eq!(ledger.num_entries(), 2);
    let balances = ledger.net_balances();
    assert_eq!(balances["a@x.test"], 0);
    assert_eq!(balances["b@x.test"], 0);
}
