//! Property-based tests for balance effects and transfers.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::status_change_delta;
use super::transfer::ensure_sufficient_funds;
use super::types::{TransactionStatus, TransactionType};

fn any_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Paid),
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Scheduled),
    ]
}

fn any_type() -> impl Strategy<Value = TransactionType> {
    prop_oneof![Just(TransactionType::Income), Just(TransactionType::Expense)]
}

proptest! {
    /// Property: moving a transaction away from a status and back restores the balance.
    #[test]
    fn test_round_trip_restores_balance(
        ty in any_type(),
        cents in 1i64..100_000_000,
        start_cents in -100_000_000i64..100_000_000,
        a in any_status(),
        b in any_status(),
    ) {
        let amount = Decimal::new(cents, 2);
        let start = Decimal::new(start_cents, 2);

        let there = status_change_delta(ty, amount, a, b).unwrap_or_default();
        let back = status_change_delta(ty, amount, b, a).unwrap_or_default();

        prop_assert_eq!(start + there + back, start);
    }

    /// Property: a status change only moves the balance when it crosses PAID.
    #[test]
    fn test_only_paid_boundary_moves_balance(
        ty in any_type(),
        cents in 1i64..100_000_000,
        a in any_status(),
        b in any_status(),
    ) {
        let amount = Decimal::new(cents, 2);
        let delta = status_change_delta(ty, amount, a, b);
        prop_assert_eq!(delta.is_some(), a.is_paid() != b.is_paid());
        if let Some(delta) = delta {
            prop_assert_eq!(delta.abs(), amount);
        }
    }

    /// Property: an accepted transfer conserves the combined balance and never
    /// drives the source negative.
    #[test]
    fn test_transfer_conserves_total(
        from_cents in 0i64..100_000_000,
        to_cents in -100_000_000i64..100_000_000,
        amount_cents in 1i64..200_000_000,
    ) {
        let from = Decimal::new(from_cents, 2);
        let to = Decimal::new(to_cents, 2);
        let amount = Decimal::new(amount_cents, 2);

        if ensure_sufficient_funds(from, amount).is_ok() {
            let (new_from, new_to) = (from - amount, to + amount);
            prop_assert_eq!(new_from + new_to, from + to);
            prop_assert!(new_from >= Decimal::ZERO);
        } else {
            prop_assert!(from < amount);
        }
    }
}
