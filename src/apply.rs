// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Single-record mutations: goal contributions and transaction writes.
//!
//! Input is expected to have passed [`crate::validate`] already. Anything
//! that would need coercing is rejected instead.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{Error, RecordKind, Result};
use crate::models::{Contribution, Goal, RecordId, Transaction};
use crate::store::RecordStore;

/// Adds `contribution.amount` to its goal and stamps `last_contribution`.
///
/// Over-funding is allowed; the goal's progress simply exceeds 100%.
pub fn apply_contribution(
    goals: &RecordStore<Goal>,
    contribution: &Contribution,
) -> Result<RecordStore<Goal>> {
    if contribution.amount <= Decimal::ZERO {
        return Err(Error::invalid(
            "amount",
            "contribution must be greater than 0",
        ));
    }
    let goal = goals
        .get(contribution.goal_id)
        .ok_or_else(|| Error::not_found(RecordKind::Goal, contribution.goal_id))?;
    let total = goal
        .current_amount
        .checked_add(contribution.amount)
        .ok_or_else(|| Error::invalid("amount", "saved amount would overflow"))?;
    let updated = goals.update_by_id(contribution.goal_id, |g| {
        g.current_amount = total;
        g.last_contribution = Some(contribution.date);
    })?;
    debug!(
        goal_id = contribution.goal_id,
        amount = %contribution.amount,
        "applied contribution"
    );
    Ok(updated)
}

fn check_magnitude(t: &Transaction) -> Result<()> {
    if t.amount < Decimal::ZERO {
        return Err(Error::invalid(
            "amount",
            "must be stored as a positive magnitude; use the transaction type for direction",
        ));
    }
    if t.description.trim().is_empty() {
        return Err(Error::invalid("description", "is required"));
    }
    Ok(())
}

/// Records a new transaction at the front of the list, newest first.
pub fn apply_transaction_add(
    transactions: &RecordStore<Transaction>,
    transaction: Transaction,
) -> Result<RecordStore<Transaction>> {
    check_magnitude(&transaction)?;
    Ok(transactions.prepend(transaction))
}

/// Replaces an existing transaction in place.
pub fn apply_transaction_edit(
    transactions: &RecordStore<Transaction>,
    id: RecordId,
    transaction: Transaction,
) -> Result<RecordStore<Transaction>> {
    check_magnitude(&transaction)?;
    transactions.replace_by_id(id, transaction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContributionKind, GoalType, TransactionCategory, TransactionKind};
    use crate::store::create_store;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn emergency_fund() -> Goal {
        Goal {
            id: 1,
            name: "Emergency Fund".into(),
            description: "Build a 6-month emergency fund".into(),
            kind: GoalType::Emergency,
            target_amount: dec!(15000),
            current_amount: dec!(8500),
            target_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            priority: true,
            monthly_contribution: Some(dec!(500)),
            created_at: at(2024, 1, 15),
            last_contribution: None,
        }
    }

    fn contribution(goal_id: RecordId, amount: Decimal) -> Contribution {
        Contribution {
            goal_id,
            amount,
            note: None,
            date: at(2025, 2, 1),
            kind: ContributionKind::Manual,
        }
    }

    #[test]
    fn contribution_moves_goal_to_sixty_percent() {
        let goals = create_store(vec![emergency_fund()]);
        let updated = apply_contribution(&goals, &contribution(1, dec!(500))).unwrap();
        let g = updated.get(1).unwrap();
        assert_eq!(g.current_amount, dec!(9000));
        assert_eq!(g.progress_pct(), dec!(60));
        assert_eq!(g.last_contribution, Some(at(2025, 2, 1)));
        assert_eq!(goals.get(1).unwrap().current_amount, dec!(8500));
    }

    #[test]
    fn contribution_to_unknown_goal_fails() {
        let goals = create_store(vec![emergency_fund()]);
        let err = apply_contribution(&goals, &contribution(9, dec!(10))).unwrap_err();
        assert_eq!(err, Error::not_found(RecordKind::Goal, 9));
    }

    #[test]
    fn non_positive_contribution_is_rejected() {
        let goals = create_store(vec![emergency_fund()]);
        assert!(matches!(
            apply_contribution(&goals, &contribution(1, Decimal::ZERO)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn overfunding_is_not_clamped() {
        let goals = create_store(vec![emergency_fund()]);
        let updated = apply_contribution(&goals, &contribution(1, dec!(10000))).unwrap();
        let g = updated.get(1).unwrap();
        assert_eq!(g.current_amount, dec!(18500));
        assert_eq!(g.progress_pct(), dec!(100));
        assert_eq!(g.raw_progress(), dec!(18500) / dec!(15000) * dec!(100));
    }

    #[test]
    fn contribution_past_decimal_range_is_rejected() {
        let goal = Goal {
            current_amount: Decimal::MAX,
            ..emergency_fund()
        };
        let goals = create_store(vec![goal]);
        let err = apply_contribution(&goals, &contribution(1, dec!(1))).unwrap_err();
        assert_eq!(err.fields()[0].field, "amount");
        assert_eq!(goals.get(1).unwrap().current_amount, Decimal::MAX);
    }

    fn coffee(amount: Decimal) -> Transaction {
        Transaction {
            id: 0,
            date: NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
            description: "Coffee Shop".into(),
            category: TransactionCategory::Food,
            account: "checking".into(),
            amount,
            kind: TransactionKind::Expense,
            notes: None,
            tags: vec!["coffee".into()],
            recurring: None,
        }
    }

    #[test]
    fn added_transactions_go_first() {
        let store = create_store(vec![Transaction {
            id: 1,
            ..coffee(dec!(3))
        }]);
        let store = apply_transaction_add(&store, coffee(dec!(12.50))).unwrap();
        assert_eq!(store.records()[0].id, 2);
        assert_eq!(store.records()[0].amount, dec!(12.50));
    }

    #[test]
    fn negative_amounts_are_rejected_not_coerced() {
        let store = create_store(Vec::new());
        let err = apply_transaction_add(&store, coffee(dec!(-12.50))).unwrap_err();
        assert_eq!(err.fields()[0].field, "amount");
    }

    #[test]
    fn edit_replaces_in_place() {
        let store = create_store(vec![Transaction {
            id: 4,
            ..coffee(dec!(3))
        }]);
        let mut edited = coffee(dec!(4.25));
        edited.description = "Coffee and pastry".into();
        let store = apply_transaction_edit(&store, 4, edited).unwrap();
        assert_eq!(store.records()[0].id, 4);
        assert_eq!(store.records()[0].description, "Coffee and pastry");
        assert!(apply_transaction_edit(&store, 7, coffee(dec!(1))).is_err());
    }
}
