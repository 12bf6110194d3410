// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Single-key stable ordering of record collections.
//!
//! Text keys compare by their Unicode lowercase form, code point by code
//! point. No locale collation is applied, so the order is identical on every
//! platform. Records whose keys compare equal keep their input order in
//! either direction.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Budget, Goal, Transaction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(format!("unknown sort order '{}', expected asc|desc", other)),
        }
    }
}

/// A comparator over one record kind.
pub trait SortKey<R> {
    fn compare(&self, a: &R, b: &R) -> Ordering;
}

/// Case-insensitive text comparison used by every string key.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Returns a sorted copy of `records`; the input is left as is.
pub fn sort_by<R, K>(records: &[R], key: K, direction: Direction) -> Vec<R>
where
    R: Clone,
    K: SortKey<R>,
{
    let mut out = records.to_vec();
    // slice::sort_by is stable; reversing an Equal ordering keeps it Equal
    out.sort_by(|a, b| match direction {
        Direction::Asc => key.compare(a, b),
        Direction::Desc => key.compare(a, b).reverse(),
    });
    out
}

macro_rules! key_names {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($ty::$variant => f.write_str($name)),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(format!(
                        "unknown sort key '{}', expected one of: {}",
                        other,
                        [$($name),+].join(", ")
                    )),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSortKey {
    #[default]
    Date,
    /// Absolute amount.
    Amount,
    Description,
    Category,
    Account,
}

key_names!(TransactionSortKey {
    Date => "date",
    Amount => "amount",
    Description => "description",
    Category => "category",
    Account => "account",
});

impl TransactionSortKey {
    pub fn default_direction(&self) -> Direction {
        match self {
            TransactionSortKey::Date => Direction::Desc,
            _ => Direction::Asc,
        }
    }
}

impl SortKey<Transaction> for TransactionSortKey {
    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            TransactionSortKey::Date => a.date.cmp(&b.date),
            TransactionSortKey::Amount => a.amount.abs().cmp(&b.amount.abs()),
            TransactionSortKey::Description => compare_text(&a.description, &b.description),
            TransactionSortKey::Category => compare_text(a.category.as_str(), b.category.as_str()),
            TransactionSortKey::Account => compare_text(a.account_name(), b.account_name()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetSortKey {
    /// Category name.
    #[default]
    Name,
    Allocated,
    Spent,
    /// `max(allocated - spent, 0)`.
    Remaining,
    /// Uncapped spent percentage.
    Progress,
}

key_names!(BudgetSortKey {
    Name => "name",
    Allocated => "allocated",
    Spent => "spent",
    Remaining => "remaining",
    Progress => "progress",
});

impl SortKey<Budget> for BudgetSortKey {
    fn compare(&self, a: &Budget, b: &Budget) -> Ordering {
        match self {
            BudgetSortKey::Name => compare_text(&a.category, &b.category),
            BudgetSortKey::Allocated => a.allocated.cmp(&b.allocated),
            BudgetSortKey::Spent => a.spent.cmp(&b.spent),
            BudgetSortKey::Remaining => a.remaining().cmp(&b.remaining()),
            BudgetSortKey::Progress => a.percentage().cmp(&b.percentage()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalSortKey {
    /// Priority goals first, then earliest target date.
    #[default]
    Priority,
    /// Uncapped funding percentage.
    Progress,
    #[serde(rename = "amount")]
    TargetAmount,
    Deadline,
    Remaining,
    Name,
}

key_names!(GoalSortKey {
    Priority => "priority",
    Progress => "progress",
    TargetAmount => "amount",
    Deadline => "deadline",
    Remaining => "remaining",
    Name => "name",
});

impl GoalSortKey {
    /// Most funded and largest goals read best at the top.
    pub fn default_direction(&self) -> Direction {
        match self {
            GoalSortKey::Progress | GoalSortKey::TargetAmount => Direction::Desc,
            _ => Direction::Asc,
        }
    }
}

impl SortKey<Goal> for GoalSortKey {
    fn compare(&self, a: &Goal, b: &Goal) -> Ordering {
        match self {
            // one comparator: `true` must sort before `false`
            GoalSortKey::Priority => b
                .priority
                .cmp(&a.priority)
                .then_with(|| a.target_date.cmp(&b.target_date)),
            GoalSortKey::Progress => a.raw_progress().cmp(&b.raw_progress()),
            GoalSortKey::TargetAmount => a.target_amount.cmp(&b.target_amount),
            GoalSortKey::Deadline => a.target_date.cmp(&b.target_date),
            GoalSortKey::Remaining => a.remaining().cmp(&b.remaining()),
            GoalSortKey::Name => compare_text(&a.name, &b.name),
        }
    }
}
