// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Whole days from `today` to `due`; negative once overdue.
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "status", content = "days")]
pub enum DueStatus {
    Overdue(i64),
    DueToday,
    DueTomorrow,
    /// Due within a week.
    DueSoon(i64),
    Upcoming(i64),
}

impl DueStatus {
    pub fn of(due: NaiveDate, today: NaiveDate) -> Self {
        match days_until(due, today) {
            d if d < 0 => DueStatus::Overdue(-d),
            0 => DueStatus::DueToday,
            1 => DueStatus::DueTomorrow,
            d if d <= 7 => DueStatus::DueSoon(d),
            d => DueStatus::Upcoming(d),
        }
    }

    /// Overdue or due within three days.
    pub fn is_urgent(&self) -> bool {
        match self {
            DueStatus::Overdue(_) | DueStatus::DueToday | DueStatus::DueTomorrow => true,
            DueStatus::DueSoon(d) => *d <= 3,
            DueStatus::Upcoming(_) => false,
        }
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueStatus::Overdue(d) => write!(f, "{} days overdue", d),
            DueStatus::DueToday => f.write_str("Due Today"),
            DueStatus::DueTomorrow => f.write_str("Due Tomorrow"),
            DueStatus::DueSoon(d) => write!(f, "Due in {} days", d),
            DueStatus::Upcoming(d) => write!(f, "Due in {} days", d),
        }
    }
}
