// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{StatusBucket, Thresholds, overall_progress};
use crate::error::RecordKind;

pub type RecordId = i64;

/// Behaviour shared by every record kind held in a [`crate::store::RecordStore`].
pub trait Record: Clone {
    const KIND: RecordKind;

    fn id(&self) -> RecordId;
    fn set_id(&mut self, id: RecordId);
}

/// Implements `Display` and `FromStr` for a fieldless enum using its wire names.
macro_rules! str_enum {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(format!(
                        "unknown {} '{}', expected one of: {}",
                        stringify!($ty),
                        other,
                        [$($name),+].join(", ")
                    )),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

str_enum!(TransactionKind {
    Income => "income",
    Expense => "expense",
    Transfer => "transfer",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionCategory {
    Food,
    Transportation,
    Shopping,
    Entertainment,
    Bills,
    Healthcare,
    Income,
    Transfer,
    Other,
}

str_enum!(TransactionCategory {
    Food => "food",
    Transportation => "transportation",
    Shopping => "shopping",
    Entertainment => "entertainment",
    Bills => "bills",
    Healthcare => "healthcare",
    Income => "income",
    Transfer => "transfer",
    Other => "other",
});

/// Recurrence of a transaction and the period of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

str_enum!(Frequency {
    Weekly => "weekly",
    Monthly => "monthly",
    Quarterly => "quarterly",
    Yearly => "yearly",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Savings,
    Debt,
    Emergency,
    Vacation,
    Home,
    Car,
    Education,
    Retirement,
    Custom,
}

str_enum!(GoalType {
    Savings => "savings",
    Debt => "debt",
    Emergency => "emergency",
    Vacation => "vacation",
    Home => "home",
    Car => "car",
    Education => "education",
    Retirement => "retirement",
    Custom => "custom",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionKind {
    #[default]
    Manual,
    Automatic,
}

str_enum!(ContributionKind {
    Manual => "manual",
    Automatic => "automatic",
});

const ACCOUNTS: &[(&str, &str)] = &[
    ("checking", "Chase Checking"),
    ("savings", "Chase Savings"),
    ("credit", "Chase Freedom Card"),
    ("investment", "Fidelity Investment"),
];

/// Display label for an account key; unknown keys are shown as-is.
pub fn account_display_name(key: &str) -> &str {
    ACCOUNTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, name)| *name)
        .unwrap_or(key)
}

/// Splits the comma separated tag input of the transaction form.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: RecordId,
    pub date: NaiveDate,
    pub description: String,
    pub category: TransactionCategory,
    pub account: String,
    /// Always a non-negative magnitude; `kind` carries the sign.
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "recurringFrequency", skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Frequency>,
}

impl Transaction {
    pub fn is_recurring(&self) -> bool {
        self.recurring.is_some()
    }

    /// Amount with the display sign implied by the kind. Transfers are unsigned.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income | TransactionKind::Transfer => self.amount.abs(),
            TransactionKind::Expense => -self.amount.abs(),
        }
    }

    pub fn account_name(&self) -> &str {
        account_display_name(&self.account)
    }
}

impl Record for Transaction {
    const KIND: RecordKind = RecordKind::Transaction;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: RecordId,
    /// Display name of the budgeted category.
    pub category: String,
    pub allocated: Decimal,
    pub spent: Decimal,
    pub period: Frequency,
    /// Percentage (0-100) at which the budget card raises an alert.
    pub alert_threshold: Decimal,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub weekly_spending: [Decimal; 7],
}

impl Budget {
    /// `spent / allocated * 100`, uncapped so 150% stays distinguishable from 100%.
    pub fn percentage(&self) -> Decimal {
        overall_progress(self.spent, self.allocated)
    }

    /// Percentage clamped to 100 for progress bars.
    pub fn display_percentage(&self) -> Decimal {
        self.percentage().min(Decimal::ONE_HUNDRED)
    }

    pub fn remaining(&self) -> Decimal {
        self.allocated.saturating_sub(self.spent).max(Decimal::ZERO)
    }

    pub fn status(&self, thresholds: &Thresholds) -> StatusBucket {
        thresholds.classify(self.percentage())
    }

    pub fn alert_triggered(&self) -> bool {
        self.percentage() >= self.alert_threshold
    }
}

impl Record for Budget {
    const KIND: RecordKind = RecordKind::Budget;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: GoalType,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub priority: bool,
    /// Monthly auto-contribution; `None` when auto-contribute is off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_contribution: Option<Decimal>,
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contribution: Option<NaiveDateTime>,
}

impl Goal {
    pub fn auto_contribute(&self) -> bool {
        self.monthly_contribution.is_some()
    }

    pub fn remaining(&self) -> Decimal {
        self.target_amount
            .saturating_sub(self.current_amount)
            .max(Decimal::ZERO)
    }

    /// Uncapped funding ratio as a percentage.
    pub fn raw_progress(&self) -> Decimal {
        overall_progress(self.current_amount, self.target_amount)
    }

    /// Funding percentage capped at 100.
    pub fn progress_pct(&self) -> Decimal {
        self.raw_progress().min(Decimal::ONE_HUNDRED)
    }

    pub fn is_completed(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Whole days from `today` until the target date; negative when overdue.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.target_date - today).num_days()
    }

    /// Savings needed per 30-day month to hit the target.
    ///
    /// The runway is floored at one month, so overdue and same-day goals
    /// report the whole remainder rather than an inflated or negative figure.
    pub fn monthly_required(&self, today: NaiveDate) -> Decimal {
        let months = (Decimal::from(self.days_remaining(today)) / Decimal::from(30))
            .max(Decimal::ONE);
        self.remaining() / months
    }
}

impl Record for Goal {
    const KIND: RecordKind = RecordKind::Goal;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// A single addition to a goal. Folded into the goal, never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub goal_id: RecordId,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub date: NaiveDateTime,
    #[serde(default, rename = "type")]
    pub kind: ContributionKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn goal(target: Decimal, current: Decimal, target_date: NaiveDate) -> Goal {
        Goal {
            id: 1,
            name: "Emergency Fund".into(),
            description: String::new(),
            kind: GoalType::Emergency,
            target_amount: target,
            current_amount: current,
            target_date,
            priority: true,
            monthly_contribution: None,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            last_contribution: None,
        }
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("Income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!(" monthly ".parse::<Frequency>(), Ok(Frequency::Monthly));
        assert!("weird".parse::<GoalType>().is_err());
        assert_eq!(GoalType::Car.to_string(), "car");
    }

    #[test]
    fn tags_are_trimmed_and_empty_ones_dropped() {
        assert_eq!(parse_tags("groceries, weekly,, "), vec!["groceries", "weekly"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn account_names_fall_back_to_key() {
        assert_eq!(account_display_name("credit"), "Chase Freedom Card");
        assert_eq!(account_display_name("brokerage"), "brokerage");
    }

    #[test]
    fn goal_derived_quantities() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let g = goal(dec!(15000), dec!(9000), NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(g.remaining(), dec!(6000));
        assert_eq!(g.progress_pct(), dec!(60));
        assert_eq!(g.days_remaining(today), 60);
        assert_eq!(g.monthly_required(today), dec!(3000));
    }

    #[test]
    fn overdue_goal_requires_whole_remainder_in_one_month() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let g = goal(dec!(5000), dec!(4800), NaiveDate::from_ymd_opt(2024, 11, 30).unwrap());
        assert!(g.days_remaining(today) < 0);
        assert_eq!(g.monthly_required(today), dec!(200));
    }

    #[test]
    fn overfunded_goal_caps_progress_but_keeps_raw_ratio() {
        let g = goal(dec!(100), dec!(150), NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        assert_eq!(g.progress_pct(), dec!(100));
        assert_eq!(g.raw_progress(), dec!(150));
        assert_eq!(g.remaining(), Decimal::ZERO);
        assert!(g.is_completed());
    }

    #[test]
    fn expense_amounts_display_negative() {
        let t = Transaction {
            id: 1,
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            description: "Grocery Store".into(),
            category: TransactionCategory::Food,
            account: "checking".into(),
            amount: dec!(127.45),
            kind: TransactionKind::Expense,
            notes: None,
            tags: vec![],
            recurring: None,
        };
        assert_eq!(t.signed_amount(), dec!(-127.45));
        assert_eq!(t.account_name(), "Chase Checking");
        assert!(!t.is_recurring());
    }
}
