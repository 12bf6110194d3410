// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Form-level checks run before a record reaches the store or the applier.
//!
//! Each check collects every failing field so a form can flag them together.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{Error, FieldError, Result};
use crate::models::{Budget, Contribution, Goal, Transaction};

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn check(&mut self, ok: bool, field: &'static str, message: &str) {
        if !ok {
            self.0.push(FieldError::new(field, message));
        }
    }

    fn finish(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.0))
        }
    }
}

pub fn transaction(t: &Transaction) -> Result<()> {
    let mut c = Collector::default();
    c.check(t.amount > Decimal::ZERO, "amount", "Please enter a valid amount");
    c.check(!t.description.trim().is_empty(), "description", "Description is required");
    c.check(!t.account.trim().is_empty(), "account", "Please select an account");
    c.finish()
}

pub fn budget(b: &Budget) -> Result<()> {
    let mut c = Collector::default();
    c.check(!b.category.trim().is_empty(), "category", "Please select a category");
    c.check(b.allocated > Decimal::ZERO, "allocated", "Please enter a valid budget amount");
    c.check(b.spent >= Decimal::ZERO, "spent", "Spent cannot be negative");
    c.check(
        (Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&b.alert_threshold),
        "alertThreshold",
        "Alert threshold must be between 0 and 100",
    );
    c.finish()
}

/// Checks a goal on create or edit. The target date must lie after `today`.
pub fn goal(g: &Goal, today: NaiveDate) -> Result<()> {
    let mut c = Collector::default();
    c.check(!g.name.trim().is_empty(), "name", "Goal name is required");
    c.check(
        g.target_amount > Decimal::ZERO,
        "targetAmount",
        "Target amount must be greater than 0",
    );
    c.check(
        g.current_amount >= Decimal::ZERO,
        "currentAmount",
        "Current amount cannot be negative",
    );
    c.check(g.target_date > today, "targetDate", "Target date must be in the future");
    c.check(
        g.monthly_contribution.is_none_or(|m| m > Decimal::ZERO),
        "monthlyContribution",
        "Monthly contribution must be greater than 0",
    );
    c.finish()
}

pub fn contribution(contribution: &Contribution, ceiling: Decimal) -> Result<()> {
    let mut c = Collector::default();
    c.check(contribution.amount > Decimal::ZERO, "amount", "Please enter a valid amount");
    if contribution.amount > ceiling {
        c.0.push(FieldError::new(
            "amount",
            format!("Maximum contribution amount is {}", ceiling),
        ));
    }
    c.finish()
}
