// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Percentage-based budget templates expanded against a monthly income.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{Budget, Frequency};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TemplateLine {
    pub category: &'static str,
    pub percentage: u32,
    pub icon: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BudgetTemplate {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub lines: &'static [TemplateLine],
}

const fn line(
    category: &'static str,
    percentage: u32,
    icon: &'static str,
    color: &'static str,
) -> TemplateLine {
    TemplateLine {
        category,
        percentage,
        icon,
        color,
    }
}

pub const TEMPLATES: &[BudgetTemplate] = &[
    BudgetTemplate {
        id: 1,
        name: "50/30/20 Rule",
        description: "Allocate 50% for needs, 30% for wants, 20% for savings",
        lines: &[
            line("Housing & Utilities", 25, "Home", "bg-blue-500"),
            line("Groceries", 15, "ShoppingCart", "bg-green-500"),
            line("Transportation", 10, "Car", "bg-purple-500"),
            line("Entertainment", 15, "Film", "bg-pink-500"),
            line("Dining Out", 10, "Coffee", "bg-orange-500"),
            line("Shopping", 5, "ShoppingBag", "bg-red-500"),
            line("Savings", 20, "PiggyBank", "bg-yellow-500"),
        ],
    },
    BudgetTemplate {
        id: 2,
        name: "Student Budget",
        description: "Budget template optimized for students and young professionals",
        lines: &[
            line("Housing & Utilities", 30, "Home", "bg-blue-500"),
            line("Groceries", 20, "ShoppingCart", "bg-green-500"),
            line("Transportation", 15, "Car", "bg-purple-500"),
            line("Entertainment", 15, "Film", "bg-pink-500"),
            line("Education", 10, "BookOpen", "bg-indigo-500"),
            line("Savings", 10, "PiggyBank", "bg-yellow-500"),
        ],
    },
    BudgetTemplate {
        id: 3,
        name: "Family Budget",
        description: "Comprehensive budget for families with children",
        lines: &[
            line("Housing & Utilities", 30, "Home", "bg-blue-500"),
            line("Groceries", 18, "ShoppingCart", "bg-green-500"),
            line("Transportation", 12, "Car", "bg-purple-500"),
            line("Healthcare", 8, "Heart", "bg-red-500"),
            line("Childcare & Education", 12, "Baby", "bg-pink-500"),
            line("Entertainment", 8, "Film", "bg-orange-500"),
            line("Savings", 12, "PiggyBank", "bg-yellow-500"),
        ],
    },
    BudgetTemplate {
        id: 4,
        name: "Minimalist Budget",
        description: "Simple budget focusing on essentials and savings",
        lines: &[
            line("Housing & Utilities", 35, "Home", "bg-blue-500"),
            line("Groceries", 20, "ShoppingCart", "bg-green-500"),
            line("Transportation", 15, "Car", "bg-purple-500"),
            line("Healthcare", 5, "Heart", "bg-red-500"),
            line("Savings", 25, "PiggyBank", "bg-yellow-500"),
        ],
    },
];

/// Looks a template up by id or by case-insensitive name.
pub fn find_template(key: &str) -> Option<&'static BudgetTemplate> {
    let key = key.trim();
    TEMPLATES.iter().find(|t| {
        key.parse::<u32>().is_ok_and(|id| id == t.id) || t.name.eq_ignore_ascii_case(key)
    })
}

/// `round(income * percentage / 100)` to whole currency units, halves away from zero.
pub fn allocation(income: Decimal, percentage: u32) -> Decimal {
    (income * Decimal::from(percentage) / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// New, unsaved budgets for each template line, in template order. Ids are
/// left at zero for the store to assign.
pub fn expand_template(
    template: &BudgetTemplate,
    income: Decimal,
    alert_threshold: Decimal,
) -> Vec<Budget> {
    template
        .lines
        .iter()
        .map(|l| Budget {
            id: 0,
            category: l.category.to_string(),
            allocated: allocation(income, l.percentage),
            spent: Decimal::ZERO,
            period: Frequency::Monthly,
            alert_threshold,
            icon: l.icon.to_string(),
            color: l.color.to_string(),
            weekly_spending: Default::default(),
        })
        .collect()
}
