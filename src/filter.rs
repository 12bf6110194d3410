// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Declarative filter criteria, combined with logical AND.
//!
//! Every field is optional. `None`, an empty string or the literal `"all"`
//! leaves that dimension unfiltered.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{StatusBucket, Thresholds};
use crate::models::{
    Budget, Frequency, Goal, GoalType, Transaction, TransactionCategory, TransactionKind,
};
use crate::utils::today;

/// A set of predicates over one record kind.
pub trait Criteria<R> {
    /// True when no predicate is active.
    fn is_default(&self) -> bool;

    /// Whether `record` passes every active predicate. Date presets resolve
    /// against `today`.
    fn matches(&self, record: &R, today: NaiveDate) -> bool;
}

/// Filters against the current local date.
///
/// Presets such as "this month" resolve at call time, so two calls spanning
/// midnight may disagree.
pub fn apply_filters<'a, R, C>(records: &'a [R], criteria: &C) -> Cow<'a, [R]>
where
    R: Clone,
    C: Criteria<R>,
{
    apply_filters_at(records, criteria, today())
}

/// Order-preserving subset of `records` passing `criteria`. Default criteria
/// hand back the input slice itself.
pub fn apply_filters_at<'a, R, C>(records: &'a [R], criteria: &C, today: NaiveDate) -> Cow<'a, [R]>
where
    R: Clone,
    C: Criteria<R>,
{
    if criteria.is_default() {
        return Cow::Borrowed(records);
    }
    Cow::Owned(
        records
            .iter()
            .filter(|r| criteria.matches(r, today))
            .cloned()
            .collect(),
    )
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Named or explicit date window. Bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "range")]
pub enum DateRange {
    #[default]
    All,
    Today,
    /// The seven days up to and including today.
    Week,
    Month,
    Quarter,
    Year,
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DateRange {
    /// Inclusive lower bound, or `None` when unbounded below.
    pub fn start(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            DateRange::All => None,
            DateRange::Today => Some(today),
            DateRange::Week => Some(today - Duration::days(6)),
            DateRange::Month => today.with_day(1),
            DateRange::Quarter => {
                let first_month = (today.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(today.year(), first_month, 1)
            }
            DateRange::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            DateRange::Custom { start, .. } => *start,
        }
    }

    /// Inclusive upper bound. Presets are open ended.
    pub fn end(&self) -> Option<NaiveDate> {
        match self {
            DateRange::Custom { end, .. } => *end,
            _ => None,
        }
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.start(today).is_none_or(|s| date >= s) && self.end().is_none_or(|e| date <= e)
    }

    pub fn is_all(&self) -> bool {
        matches!(
            self,
            DateRange::All | DateRange::Custom {
                start: None,
                end: None
            }
        )
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(DateRange::All),
            "today" => Ok(DateRange::Today),
            "week" | "this-week" => Ok(DateRange::Week),
            "month" | "this-month" => Ok(DateRange::Month),
            "quarter" | "this-quarter" => Ok(DateRange::Quarter),
            "year" | "this-year" => Ok(DateRange::Year),
            other => Err(format!(
                "unknown date range '{}', expected all|today|week|month|quarter|year",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCriteria {
    /// Case-insensitive substring of description, notes or any tag.
    pub search: Option<String>,
    pub category: Option<TransactionCategory>,
    pub account: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub date_range: DateRange,
    /// Compared against the absolute amount.
    pub amount_min: Option<Decimal>,
    pub amount_max: Option<Decimal>,
}

impl Criteria<Transaction> for TransactionCriteria {
    fn is_default(&self) -> bool {
        active(&self.search).is_none()
            && self.category.is_none()
            && active(&self.account).is_none()
            && self.kind.is_none()
            && self.date_range.is_all()
            && self.amount_min.is_none()
            && self.amount_max.is_none()
    }

    fn matches(&self, t: &Transaction, today: NaiveDate) -> bool {
        if let Some(term) = active(&self.search) {
            let term = term.to_lowercase();
            let hit = contains_ci(&t.description, &term)
                || t.notes.as_deref().is_some_and(|n| contains_ci(n, &term))
                || t.tags.iter().any(|tag| contains_ci(tag, &term));
            if !hit {
                return false;
            }
        }
        if self.category.is_some_and(|c| c != t.category) {
            return false;
        }
        if active(&self.account).is_some_and(|a| a != t.account) {
            return false;
        }
        if self.kind.is_some_and(|k| k != t.kind) {
            return false;
        }
        let magnitude = t.amount.abs();
        if self.amount_min.is_some_and(|min| magnitude < min) {
            return false;
        }
        if self.amount_max.is_some_and(|max| magnitude > max) {
            return false;
        }
        self.date_range.contains(t.date, today)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCriteria {
    /// Case-insensitive substring of the category name.
    pub search: Option<String>,
    pub status: Option<StatusBucket>,
    pub period: Option<Frequency>,
    /// Boundaries used to derive `status`; not a predicate itself.
    #[serde(default)]
    pub thresholds: Thresholds,
}

impl Criteria<Budget> for BudgetCriteria {
    fn is_default(&self) -> bool {
        active(&self.search).is_none() && self.status.is_none() && self.period.is_none()
    }

    fn matches(&self, b: &Budget, _today: NaiveDate) -> bool {
        if let Some(term) = active(&self.search) {
            if !contains_ci(&b.category, &term.to_lowercase()) {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != b.status(&self.thresholds)) {
            return false;
        }
        self.period.is_none_or(|p| p == b.period)
    }
}

/// Funding state of a goal, derived on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
}

impl GoalStatus {
    pub fn of(goal: &Goal) -> Self {
        if goal.is_completed() {
            GoalStatus::Completed
        } else {
            GoalStatus::Active
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::Active => f.write_str("active"),
            GoalStatus::Completed => f.write_str("completed"),
        }
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            other => Err(format!("unknown goal status '{}', expected active|completed", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCriteria {
    /// Case-insensitive substring of the name or description.
    pub search: Option<String>,
    pub status: Option<GoalStatus>,
    #[serde(rename = "type")]
    pub kind: Option<GoalType>,
}

impl Criteria<Goal> for GoalCriteria {
    fn is_default(&self) -> bool {
        active(&self.search).is_none() && self.status.is_none() && self.kind.is_none()
    }

    fn matches(&self, g: &Goal, _today: NaiveDate) -> bool {
        if let Some(term) = active(&self.search) {
            let term = term.to_lowercase();
            if !contains_ci(&g.name, &term) && !contains_ci(&g.description, &term) {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != GoalStatus::of(g)) {
            return false;
        }
        self.kind.is_none_or(|k| k == g.kind)
    }
}

/// Number of goals behind each goal filter tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalFilterCounts {
    pub all: usize,
    pub active: usize,
    pub completed: usize,
    /// Only types with at least one goal, in declaration order.
    pub by_type: Vec<(GoalType, usize)>,
}

pub fn goal_filter_counts(goals: &[Goal]) -> GoalFilterCounts {
    let completed = goals.iter().filter(|g| g.is_completed()).count();
    let by_type = GoalType::ALL
        .iter()
        .map(|k| (*k, goals.iter().filter(|g| g.kind == *k).count()))
        .filter(|(_, n)| *n > 0)
        .collect();
    GoalFilterCounts {
        all: goals.len(),
        active: goals.len() - completed,
        completed,
        by_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(
        id: i64,
        d: NaiveDate,
        amount: Decimal,
        kind: TransactionKind,
        category: TransactionCategory,
        account: &str,
    ) -> Transaction {
        Transaction {
            id,
            date: d,
            description: format!("Transaction {}", id),
            category,
            account: account.into(),
            amount,
            kind,
            notes: None,
            tags: vec![],
            recurring: None,
        }
    }

    fn sample() -> Vec<Transaction> {
        use TransactionCategory as C;
        use TransactionKind as K;
        let mut grocery = tx(1, date(2025, 1, 15), dec!(127.45), K::Expense, C::Food, "checking");
        grocery.description = "Grocery Store - Whole Foods".into();
        grocery.tags = vec!["groceries".into(), "weekly".into()];
        let mut salary = tx(2, date(2025, 1, 14), dec!(3500), K::Income, C::Income, "checking");
        salary.notes = Some("Monthly salary".into());
        vec![
            grocery,
            salary,
            tx(3, date(2024, 12, 20), dec!(45.20), K::Expense, C::Transportation, "credit"),
            tx(4, date(2024, 9, 30), dec!(500), K::Transfer, C::Transfer, "savings"),
        ]
    }

    fn ids(v: &[Transaction]) -> Vec<i64> {
        v.iter().map(|t| t.id).collect()
    }

    #[test]
    fn type_filter_keeps_only_income() {
        let txs = vec![
            tx(
                1,
                date(2025, 1, 1),
                dec!(50),
                TransactionKind::Expense,
                TransactionCategory::Food,
                "checking",
            ),
            tx(
                2,
                date(2025, 1, 2),
                dec!(3500),
                TransactionKind::Income,
                TransactionCategory::Income,
                "checking",
            ),
        ];
        let criteria = TransactionCriteria {
            kind: Some(TransactionKind::Income),
            ..Default::default()
        };
        let out = apply_filters_at(&txs, &criteria, date(2025, 1, 20));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].amount, dec!(3500));
    }

    #[test]
    fn default_criteria_borrow_the_input() {
        let txs = sample();
        let criteria = TransactionCriteria {
            search: Some("  ".into()),
            account: Some("all".into()),
            ..Default::default()
        };
        let out = apply_filters_at(&txs, &criteria, date(2025, 1, 20));
        assert!(matches!(out, Cow::Borrowed(_)));
        assert!(std::ptr::eq(out.as_ref(), txs.as_slice()));
    }

    #[test]
    fn search_covers_description_notes_and_tags() {
        let txs = sample();
        let today = date(2025, 1, 20);
        let by = |term: &str| {
            let c = TransactionCriteria {
                search: Some(term.into()),
                ..Default::default()
            };
            ids(&apply_filters_at(&txs, &c, today))
        };
        assert_eq!(by("WHOLE"), vec![1]);
        assert_eq!(by("salary"), vec![2]);
        assert_eq!(by("weekly"), vec![1]);
        assert!(by("nothing matches").is_empty());
    }

    #[test]
    fn criteria_combine_with_and() {
        let txs = sample();
        let criteria = TransactionCriteria {
            account: Some("checking".into()),
            amount_min: Some(dec!(100)),
            amount_max: Some(dec!(1000)),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters_at(&txs, &criteria, date(2025, 1, 20))), vec![1]);
    }

    #[test]
    fn date_presets_resolve_against_today() {
        let txs = sample();
        let today = date(2025, 1, 20);
        let run = |range| {
            let c = TransactionCriteria {
                date_range: range,
                ..Default::default()
            };
            ids(&apply_filters_at(&txs, &c, today))
        };
        assert_eq!(run(DateRange::Month), vec![1, 2]);
        assert_eq!(run(DateRange::Week), vec![1, 2]);
        assert_eq!(run(DateRange::Today), Vec::<i64>::new());
        assert_eq!(run(DateRange::Year), vec![1, 2]);
        assert_eq!(run(DateRange::Quarter), vec![1, 2]);
        assert_eq!(
            run(DateRange::Custom {
                start: Some(date(2024, 9, 30)),
                end: Some(date(2024, 12, 20)),
            }),
            vec![3, 4]
        );
    }

    #[test]
    fn quarter_starts_on_first_month_of_quarter() {
        assert_eq!(DateRange::Quarter.start(date(2025, 8, 17)), Some(date(2025, 7, 1)));
        assert_eq!(DateRange::Quarter.start(date(2025, 12, 31)), Some(date(2025, 10, 1)));
        assert_eq!(DateRange::Week.start(date(2025, 3, 3)), Some(date(2025, 2, 25)));
    }

    #[test]
    fn week_preset_spans_seven_calendar_days() {
        use TransactionCategory as C;
        use TransactionKind as K;
        let txs = vec![
            tx(1, date(2025, 2, 24), dec!(10), K::Expense, C::Food, "checking"),
            tx(2, date(2025, 2, 25), dec!(20), K::Expense, C::Food, "checking"),
            tx(3, date(2025, 3, 3), dec!(30), K::Expense, C::Food, "checking"),
        ];
        let criteria = TransactionCriteria {
            date_range: DateRange::Week,
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters_at(&txs, &criteria, date(2025, 3, 3))), vec![2, 3]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let txs = sample();
        let today = date(2025, 1, 20);
        let criteria = TransactionCriteria {
            search: Some("o".into()),
            date_range: DateRange::Year,
            ..Default::default()
        };
        let once = apply_filters_at(&txs, &criteria, today).into_owned();
        let twice = apply_filters_at(&once, &criteria, today).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn budget_status_filter_uses_derived_bucket() {
        let mk = |id, allocated, spent, period| Budget {
            id,
            category: format!("B{}", id),
            allocated,
            spent,
            period,
            alert_threshold: dec!(80),
            icon: String::new(),
            color: String::new(),
            weekly_spending: Default::default(),
        };
        let budgets = vec![
            mk(1, dec!(800), dec!(650), Frequency::Monthly),
            mk(2, dec!(250), dec!(265), Frequency::Monthly),
            mk(3, dec!(200), dec!(45), Frequency::Weekly),
        ];
        let today = date(2025, 1, 1);
        let warning = BudgetCriteria {
            status: Some(StatusBucket::Warning),
            ..Default::default()
        };
        let out = apply_filters_at(&budgets, &warning, today);
        assert_eq!(out.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1]);

        let weekly = BudgetCriteria {
            period: Some(Frequency::Weekly),
            ..Default::default()
        };
        let out = apply_filters_at(&budgets, &weekly, today);
        assert_eq!(out.iter().map(|b| b.id).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn goal_filters_and_counts() {
        let mk = |id, kind, target, current| Goal {
            id,
            name: format!("Goal {}", id),
            description: String::new(),
            kind,
            target_amount: target,
            current_amount: current,
            target_date: date(2026, 1, 1),
            priority: false,
            monthly_contribution: None,
            created_at: date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
            last_contribution: None,
        };
        let goals = vec![
            mk(1, GoalType::Emergency, dec!(15000), dec!(8500)),
            mk(2, GoalType::Education, dec!(5000), dec!(5000)),
            mk(3, GoalType::Car, dec!(25000), dec!(12500)),
        ];
        let completed = GoalCriteria {
            status: Some(GoalStatus::Completed),
            ..Default::default()
        };
        let out = apply_filters_at(&goals, &completed, date(2025, 1, 1));
        assert_eq!(out.iter().map(|g| g.id).collect::<Vec<_>>(), vec![2]);

        let counts = goal_filter_counts(&goals);
        assert_eq!(counts.all, 3);
        assert_eq!(counts.active, 2);
        assert_eq!(counts.completed, 1);
        assert_eq!(
            counts.by_type,
            vec![(GoalType::Emergency, 1), (GoalType::Car, 1), (GoalType::Education, 1)]
        );
    }
}
