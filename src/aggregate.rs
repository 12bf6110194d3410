// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Summary statistics over record collections. Everything here is pure.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Budget, Goal, Transaction, TransactionKind};

/// Percentage boundaries for the on-track / warning / exceeded buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub warning: Decimal,
    pub exceeded: Decimal,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: Decimal::from(80),
            exceeded: Decimal::ONE_HUNDRED,
        }
    }
}

impl Thresholds {
    /// Buckets a percentage. `exceeded` wins when both boundaries are met.
    pub fn classify(&self, percentage: Decimal) -> StatusBucket {
        if percentage >= self.exceeded {
            StatusBucket::Exceeded
        } else if percentage >= self.warning {
            StatusBucket::Warning
        } else {
            StatusBucket::OnTrack
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusBucket {
    OnTrack,
    Warning,
    Exceeded,
}

impl StatusBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusBucket::OnTrack => "on-track",
            StatusBucket::Warning => "warning",
            StatusBucket::Exceeded => "exceeded",
        }
    }
}

impl fmt::Display for StatusBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "on-track" | "ontrack" | "on_track" => Ok(StatusBucket::OnTrack),
            "warning" => Ok(StatusBucket::Warning),
            "exceeded" => Ok(StatusBucket::Exceeded),
            other => Err(format!(
                "unknown status '{}', expected on-track|warning|exceeded",
                other
            )),
        }
    }
}

/// Records split by status bucket, each list in input order.
#[derive(Debug)]
pub struct Buckets<'a, R> {
    pub on_track: Vec<&'a R>,
    pub warning: Vec<&'a R>,
    pub exceeded: Vec<&'a R>,
}

impl<R> Buckets<'_, R> {
    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            on_track: self.on_track.len(),
            warning: self.warning.len(),
            exceeded: self.exceeded.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketCounts {
    pub on_track: usize,
    pub warning: usize,
    pub exceeded: usize,
}

/// Sums a numeric projection of every record; zero for an empty collection.
///
/// Saturates at `Decimal::MAX`/`Decimal::MIN` instead of overflowing.
pub fn sum_by<R, F>(records: &[R], selector: F) -> Decimal
where
    F: Fn(&R) -> Decimal,
{
    records
        .iter()
        .map(selector)
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// Classifies each record by the percentage returned from `percent_selector`.
pub fn bucket_by_status<'a, R, F>(
    records: &'a [R],
    percent_selector: F,
    thresholds: &Thresholds,
) -> Buckets<'a, R>
where
    F: Fn(&R) -> Decimal,
{
    let mut buckets = Buckets {
        on_track: Vec::new(),
        warning: Vec::new(),
        exceeded: Vec::new(),
    };
    for r in records {
        match thresholds.classify(percent_selector(r)) {
            StatusBucket::OnTrack => buckets.on_track.push(r),
            StatusBucket::Warning => buckets.warning.push(r),
            StatusBucket::Exceeded => buckets.exceeded.push(r),
        }
    }
    buckets
}

/// `current / target * 100`, or zero when the target is not positive.
///
/// A ratio too large to represent saturates.
pub fn overall_progress(total_current: Decimal, total_target: Decimal) -> Decimal {
    if total_target <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    total_current
        .checked_div(total_target)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if total_current.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_allocated: Decimal,
    pub total_spent: Decimal,
    /// Allocated minus spent; negative when the collection is overspent.
    pub total_remaining: Decimal,
    pub overall_progress: Decimal,
    pub overall_status: StatusBucket,
    pub counts: BucketCounts,
}

pub fn budget_summary(budgets: &[Budget], thresholds: &Thresholds) -> BudgetSummary {
    let total_allocated = sum_by(budgets, |b| b.allocated);
    let total_spent = sum_by(budgets, |b| b.spent);
    let overall = overall_progress(total_spent, total_allocated);
    BudgetSummary {
        total_allocated,
        total_spent,
        total_remaining: total_allocated.saturating_sub(total_spent),
        overall_progress: overall,
        overall_status: thresholds.classify(overall),
        counts: bucket_by_status(budgets, Budget::percentage, thresholds).counts(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSummary {
    pub total_target: Decimal,
    pub total_saved: Decimal,
    pub total_remaining: Decimal,
    pub overall_progress: Decimal,
    pub active: usize,
    pub completed: usize,
    pub average_monthly_required: Decimal,
    /// Id of the active goal with the earliest target date.
    pub next_deadline: Option<i64>,
}

pub fn goal_summary(goals: &[Goal], today: NaiveDate) -> GoalSummary {
    let total_target = sum_by(goals, |g| g.target_amount);
    let total_saved = sum_by(goals, |g| g.current_amount);
    let active: Vec<&Goal> = goals.iter().filter(|g| !g.is_completed()).collect();
    let average_monthly_required = sum_by(&active, |g| g.monthly_required(today));
    // min_by_key keeps the first of equal dates
    let next_deadline = active.iter().min_by_key(|g| g.target_date).map(|g| g.id);

    GoalSummary {
        total_target,
        total_saved,
        total_remaining: total_target.saturating_sub(total_saved),
        overall_progress: overall_progress(total_saved, total_target),
        active: active.len(),
        completed: goals.len() - active.len(),
        average_monthly_required,
        next_deadline,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetTrend {
    Positive,
    Negative,
    Flat,
}

impl fmt::Display for NetTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NetTrend::Positive => "positive",
            NetTrend::Negative => "negative",
            NetTrend::Flat => "flat",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_income: Decimal,
    pub count: usize,
}

impl TransactionStats {
    pub fn trend(&self) -> NetTrend {
        match self.net_income.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => NetTrend::Positive,
            std::cmp::Ordering::Less => NetTrend::Negative,
            std::cmp::Ordering::Equal => NetTrend::Flat,
        }
    }
}

/// Income and expense totals for the calendar month containing `today`.
pub fn transaction_stats(transactions: &[Transaction], today: NaiveDate) -> TransactionStats {
    let in_month: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.date.year() == today.year() && t.date.month() == today.month())
        .collect();
    let total_of = |kind: TransactionKind| {
        sum_by(&in_month, |t| {
            if t.kind == kind {
                t.amount.abs()
            } else {
                Decimal::ZERO
            }
        })
    };
    let total_income = total_of(TransactionKind::Income);
    let total_expenses = total_of(TransactionKind::Expense);

    TransactionStats {
        total_income,
        total_expenses,
        net_income: total_income.saturating_sub(total_expenses),
        count: in_month.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, GoalType, TransactionCategory};
    use rust_decimal_macros::dec;

    fn budget(id: i64, allocated: Decimal, spent: Decimal) -> Budget {
        Budget {
            id,
            category: format!("Budget {}", id),
            allocated,
            spent,
            period: Frequency::Monthly,
            alert_threshold: dec!(80),
            icon: String::new(),
            color: String::new(),
            weekly_spending: Default::default(),
        }
    }

    fn goal(id: i64, target: Decimal, current: Decimal, due: NaiveDate) -> Goal {
        Goal {
            id,
            name: format!("Goal {}", id),
            description: String::new(),
            kind: GoalType::Savings,
            target_amount: target,
            current_amount: current,
            target_date: due,
            priority: false,
            monthly_contribution: None,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            last_contribution: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn warning_bucket_at_81_25_percent() {
        let b = budget(1, dec!(800), dec!(650));
        assert_eq!(b.percentage(), dec!(81.25));
        assert_eq!(b.status(&Thresholds::default()), StatusBucket::Warning);
    }

    #[test]
    fn exceeded_bucket_keeps_uncapped_percentage() {
        let b = budget(1, dec!(250), dec!(265));
        assert_eq!(b.percentage(), dec!(106));
        assert_eq!(b.display_percentage(), dec!(100));
        assert_eq!(b.remaining(), Decimal::ZERO);
        assert_eq!(b.status(&Thresholds::default()), StatusBucket::Exceeded);
    }

    #[test]
    fn exceeded_wins_when_thresholds_coincide() {
        let t = Thresholds {
            warning: dec!(100),
            exceeded: dec!(100),
        };
        assert_eq!(t.classify(dec!(100)), StatusBucket::Exceeded);
        assert_eq!(t.classify(dec!(99.99)), StatusBucket::OnTrack);
    }

    #[test]
    fn zero_target_progress_is_zero() {
        assert_eq!(overall_progress(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(overall_progress(dec!(500), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn extreme_amounts_saturate_instead_of_panicking() {
        let b = budget(1, dec!(0.0001), Decimal::MAX);
        assert_eq!(b.percentage(), Decimal::MAX);
        assert_eq!(b.status(&Thresholds::default()), StatusBucket::Exceeded);

        let budgets = vec![b.clone(), budget(2, Decimal::MAX, Decimal::MAX)];
        let s = budget_summary(&budgets, &Thresholds::default());
        assert_eq!(s.total_spent, Decimal::MAX);
        assert_eq!(s.counts.exceeded, 2);
    }

    #[test]
    fn sum_of_empty_collection_is_zero() {
        let empty: Vec<Budget> = Vec::new();
        assert_eq!(sum_by(&empty, |b| b.spent), Decimal::ZERO);
    }

    #[test]
    fn buckets_preserve_input_order() {
        let budgets = vec![
            budget(1, dec!(100), dec!(120)),
            budget(2, dec!(100), dec!(10)),
            budget(3, dec!(100), dec!(100)),
            budget(4, dec!(100), dec!(85)),
        ];
        let buckets = bucket_by_status(&budgets, Budget::percentage, &Thresholds::default());
        let ids = |v: &Vec<&Budget>| v.iter().map(|b| b.id).collect::<Vec<_>>();
        assert_eq!(ids(&buckets.exceeded), vec![1, 3]);
        assert_eq!(ids(&buckets.warning), vec![4]);
        assert_eq!(ids(&buckets.on_track), vec![2]);
    }

    #[test]
    fn budget_summary_totals_and_counts() {
        let budgets = vec![
            budget(1, dec!(800), dec!(650)),
            budget(2, dec!(400), dec!(320)),
            budget(3, dec!(250), dec!(265)),
            budget(4, dec!(200), dec!(45)),
        ];
        let s = budget_summary(&budgets, &Thresholds::default());
        assert_eq!(s.total_allocated, dec!(1650));
        assert_eq!(s.total_spent, dec!(1280));
        assert_eq!(s.total_remaining, dec!(370));
        assert_eq!(
            s.counts,
            BucketCounts {
                on_track: 1,
                warning: 2,
                exceeded: 1
            }
        );
        assert_eq!(s.overall_status, StatusBucket::OnTrack);
    }

    #[test]
    fn goal_summary_counts_active_and_next_deadline() {
        let today = date(2025, 1, 1);
        let goals = vec![
            goal(1, dec!(15000), dec!(8500), date(2025, 12, 31)),
            goal(2, dec!(5000), dec!(5000), date(2025, 2, 1)),
            goal(3, dec!(8000), dec!(3200), date(2025, 6, 15)),
        ];
        let s = goal_summary(&goals, today);
        assert_eq!(s.total_target, dec!(28000));
        assert_eq!(s.total_saved, dec!(16700));
        assert_eq!(s.active, 2);
        assert_eq!(s.completed, 1);
        assert_eq!(s.next_deadline, Some(3));
        let expected = goals[0].monthly_required(today) + goals[2].monthly_required(today);
        assert_eq!(s.average_monthly_required, expected);
    }

    #[test]
    fn goal_summary_of_nothing_is_zero() {
        let s = goal_summary(&[], date(2025, 1, 1));
        assert_eq!(s.overall_progress, Decimal::ZERO);
        assert_eq!(s.next_deadline, None);
    }

    #[test]
    fn stats_only_count_current_month() {
        let tx = |id, d, amount, kind| Transaction {
            id,
            date: d,
            description: "t".into(),
            category: TransactionCategory::Other,
            account: "checking".into(),
            amount,
            kind,
            notes: None,
            tags: vec![],
            recurring: None,
        };
        let txs = vec![
            tx(1, date(2025, 1, 15), dec!(3500), TransactionKind::Income),
            tx(2, date(2025, 1, 14), dec!(127.45), TransactionKind::Expense),
            tx(3, date(2025, 1, 5), dec!(500), TransactionKind::Transfer),
            tx(4, date(2024, 12, 30), dec!(99), TransactionKind::Expense),
        ];
        let s = transaction_stats(&txs, date(2025, 1, 20));
        assert_eq!(s.total_income, dec!(3500));
        assert_eq!(s.total_expenses, dec!(127.45));
        assert_eq!(s.net_income, dec!(3372.55));
        assert_eq!(s.count, 3);
        assert_eq!(s.trend(), NetTrend::Positive);
    }
}
