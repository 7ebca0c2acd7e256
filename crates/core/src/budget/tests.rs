use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::evaluator::apply_transaction;
use super::types::{BudgetCharge, BudgetScope, TransactionKind};

fn charge(amount: Decimal, limit: Decimal) -> BudgetCharge {
    BudgetCharge {
        budget_id: Uuid::new_v4(),
        amount,
        limit,
    }
}

#[test]
fn test_expense_under_limit_no_breach() {
    let user = Uuid::new_v4();
    let mut overall = charge(dec!(0), dec!(100));

    let breaches = apply_transaction(
        user,
        dec!(60),
        TransactionKind::Expense,
        Some(&mut overall),
        None,
    );

    assert_eq!(overall.amount, dec!(60));
    assert!(breaches.is_empty());
}

#[test]
fn test_expense_over_limit_breaches_overall() {
    let user = Uuid::new_v4();
    let mut overall = charge(dec!(60), dec!(100));

    let breaches = apply_transaction(
        user,
        dec!(50),
        TransactionKind::Expense,
        Some(&mut overall),
        None,
    );

    assert_eq!(overall.amount, dec!(110));
    assert_eq!(breaches.len(), 1);
    assert_eq!(breaches[0].user_id, user);
    assert_eq!(breaches[0].scope, BudgetScope::Overall);
    assert_eq!(breaches[0].message, "Budget limit exceeded for overall budget");
}

// Breach fires strictly past the limit: landing exactly on it is fine,
// one cent over is not.
#[rstest]
#[case(dec!(59.99), false)]
#[case(dec!(60.00), false)]
#[case(dec!(60.01), true)]
fn test_breach_boundary_around_limit(#[case] amount: Decimal, #[case] breaches_expected: bool) {
    let mut overall = charge(dec!(40), dec!(100));

    let breaches = apply_transaction(
        Uuid::new_v4(),
        amount,
        TransactionKind::Expense,
        Some(&mut overall),
        None,
    );

    assert_eq!(overall.amount, dec!(40) + amount);
    assert_eq!(breaches.is_empty(), !breaches_expected);
}

#[test]
fn test_account_breach_carries_account_name() {
    let mut account = charge(dec!(90), dec!(100));

    let breaches = apply_transaction(
        Uuid::new_v4(),
        dec!(20),
        TransactionKind::Expense,
        None,
        Some((&mut account, "Checking")),
    );

    assert_eq!(breaches.len(), 1);
    assert_eq!(breaches[0].scope, BudgetScope::Account);
    assert_eq!(breaches[0].message, "Budget limit exceeded for account Checking");
}

#[test]
fn test_both_scopes_can_breach_in_one_call() {
    let mut overall = charge(dec!(95), dec!(100));
    let mut account = charge(dec!(45), dec!(50));

    let breaches = apply_transaction(
        Uuid::new_v4(),
        dec!(10),
        TransactionKind::Expense,
        Some(&mut overall),
        Some((&mut account, "Savings")),
    );

    assert_eq!(breaches.len(), 2);
    assert_eq!(breaches[0].scope, BudgetScope::Overall);
    assert_eq!(breaches[1].scope, BudgetScope::Account);
}

#[test]
fn test_income_never_mutates_budgets() {
    let mut overall = charge(dec!(60), dec!(100));
    let mut account = charge(dec!(60), dec!(50));

    let breaches = apply_transaction(
        Uuid::new_v4(),
        dec!(1000),
        TransactionKind::Income,
        Some(&mut overall),
        Some((&mut account, "Checking")),
    );

    assert!(breaches.is_empty());
    assert_eq!(overall.amount, dec!(60));
    assert_eq!(account.amount, dec!(60));
}

#[test]
fn test_no_active_budgets_no_breach() {
    let breaches = apply_transaction(
        Uuid::new_v4(),
        dec!(100),
        TransactionKind::Expense,
        None,
        None,
    );
    assert!(breaches.is_empty());
}

/// Re-exceeding an already-breached budget emits a fresh breach each call.
/// This mirrors the documented no-dedup behavior.
#[test]
fn test_breaches_are_not_deduplicated_across_calls() {
    let user = Uuid::new_v4();
    let mut overall = charge(dec!(150), dec!(100));

    for _ in 0..3 {
        let breaches = apply_transaction(
            user,
            dec!(10),
            TransactionKind::Expense,
            Some(&mut overall),
            None,
        );
        assert_eq!(breaches.len(), 1);
    }

    assert_eq!(overall.amount, dec!(180));
}

/// Walkthrough: overall budget limit 100. Expense 60 -> amount 60, no
/// breach. Expense 50 -> amount 110, breach.
#[test]
fn test_overall_budget_walkthrough() {
    let user = Uuid::new_v4();
    let mut overall = charge(dec!(0), dec!(100));

    let first = apply_transaction(
        user,
        dec!(60),
        TransactionKind::Expense,
        Some(&mut overall),
        None,
    );
    assert!(first.is_empty());
    assert_eq!(overall.amount, dec!(60));

    let second = apply_transaction(
        user,
        dec!(50),
        TransactionKind::Expense,
        Some(&mut overall),
        None,
    );
    assert_eq!(second.len(), 1);
    assert_eq!(overall.amount, dec!(110));
}

proptest! {
    /// For expense amount a against (limit L, amount cur): new amount is
    /// cur + a and a breach fires iff cur + a > L.
    #[test]
    fn prop_expense_breach_iff_over_limit(
        cur in 0i64..1_000_000,
        limit in 0i64..1_000_000,
        amount in 0i64..1_000_000,
    ) {
        let cur = Decimal::new(cur, 2);
        let limit = Decimal::new(limit, 2);
        let amount = Decimal::new(amount, 2);

        let mut budget = charge(cur, limit);
        let breaches = apply_transaction(
            Uuid::new_v4(),
            amount,
            TransactionKind::Expense,
            Some(&mut budget),
            None,
        );

        prop_assert_eq!(budget.amount, cur + amount);
        prop_assert_eq!(breaches.len(), usize::from(cur + amount > limit));
    }

    /// Income leaves any budget untouched regardless of amounts.
    #[test]
    fn prop_income_is_inert(
        cur in 0i64..1_000_000,
        limit in 0i64..1_000_000,
        amount in 0i64..1_000_000,
    ) {
        let cur = Decimal::new(cur, 2);
        let mut budget = charge(cur, Decimal::new(limit, 2));

        let breaches = apply_transaction(
            Uuid::new_v4(),
            Decimal::new(amount, 2),
            TransactionKind::Income,
            Some(&mut budget),
            None,
        );

        prop_assert!(breaches.is_empty());
        prop_assert_eq!(budget.amount, cur);
    }
}
