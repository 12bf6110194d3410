// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::goal_summary;
use crate::apply::apply_contribution;
use crate::bills::DueStatus;
use crate::config::Settings;
use crate::error::{Error, RecordKind};
use crate::filter::{
    GoalCriteria, GoalFilterCounts, GoalStatus, apply_filters_at, goal_filter_counts,
};
use crate::ledger::Ledger;
use crate::models::{Contribution, ContributionKind, Goal, GoalType};
use crate::sort::{Direction, GoalSortKey, sort_by};
use crate::utils::{
    fmt_money, fmt_pct, maybe_print_json, now, opt_decimal, opt_enum, opt_filter, parse_date,
    parse_decimal, pretty_table, today,
};
use crate::validate;
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("contribute", sub)) => contribute(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("summary", sub)) => summary(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRow {
    #[serde(flatten)]
    pub goal: Goal,
    pub status: GoalStatus,
    pub progress: Decimal,
    pub remaining: Decimal,
    pub monthly_required: Decimal,
    pub due: DueStatus,
}

pub fn query_rows(
    goals: &[Goal],
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<Vec<GoalRow>> {
    let criteria = GoalCriteria {
        search: sub.get_one::<String>("search").cloned(),
        status: opt_filter(sub, "status")?,
        kind: opt_filter(sub, "type")?,
    };
    let key: GoalSortKey = opt_enum(sub, "sort")?.unwrap_or_default();
    let direction: Direction = opt_enum(sub, "order")?.unwrap_or(key.default_direction());
    let filtered = apply_filters_at(goals, &criteria, today);
    Ok(sort_by(&filtered, key, direction)
        .into_iter()
        .map(|g| GoalRow {
            status: GoalStatus::of(&g),
            progress: g.progress_pct(),
            remaining: g.remaining(),
            monthly_required: g.monthly_required(today),
            due: DueStatus::of(g.target_date, today),
            goal: g,
        })
        .collect())
}

fn counts_line(c: &GoalFilterCounts) -> String {
    let mut parts = vec![
        format!("all {}", c.all),
        format!("active {}", c.active),
        format!("completed {}", c.completed),
    ];
    parts.extend(c.by_type.iter().map(|(k, n)| format!("{} {}", k, n)));
    parts.join(" | ")
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = Ledger::load(conn)?;
    let data = query_rows(ledger.goals.records(), sub, today())?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                let due = if r.status == GoalStatus::Completed {
                    String::new()
                } else if r.due.is_urgent() {
                    format!("{} !", r.due)
                } else {
                    r.due.to_string()
                };
                vec![
                    r.goal.id.to_string(),
                    if r.goal.priority { "*".into() } else { String::new() },
                    r.goal.name.clone(),
                    r.goal.kind.to_string(),
                    fmt_money(&r.goal.current_amount),
                    fmt_money(&r.goal.target_amount),
                    fmt_pct(&r.progress),
                    fmt_money(&r.monthly_required),
                    r.goal.target_date.to_string(),
                    due,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "P", "Name", "Type", "Saved", "Target", "Progress", "Monthly", "Deadline",
                    "Due",
                ],
                rows,
            )
        );
        println!("{}", counts_line(&goal_filter_counts(ledger.goals.records())));
    }
    Ok(())
}

/// Overlays the goal form flags present in `sub` onto `g`.
fn read_form(sub: &clap::ArgMatches, mut g: Goal) -> Result<Goal> {
    if let Some(v) = sub.get_one::<String>("name") {
        g.name = v.trim().to_string();
    }
    if let Some(v) = sub.get_one::<String>("description") {
        g.description = v.trim().to_string();
    }
    if let Some(v) = opt_enum(sub, "type")? {
        g.kind = v;
    }
    if let Some(v) = opt_decimal(sub, "target")? {
        g.target_amount = v;
    }
    if let Some(v) = opt_decimal(sub, "current")? {
        g.current_amount = v;
    }
    if let Some(v) = sub.get_one::<String>("deadline") {
        g.target_date = parse_date(v)?;
    }
    if let Some(v) = sub.get_one::<String>("monthly") {
        g.monthly_contribution = match v.trim() {
            "" | "off" | "none" => None,
            raw => Some(parse_decimal(raw)?),
        };
    }
    Ok(g)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = today();
    let mut ledger = Ledger::load(conn)?;
    let blank = Goal {
        id: 0,
        name: String::new(),
        description: String::new(),
        kind: GoalType::Savings,
        target_amount: Decimal::ZERO,
        current_amount: Decimal::ZERO,
        target_date: today,
        priority: sub.get_flag("priority"),
        monthly_contribution: None,
        created_at: now(),
        last_contribution: None,
    };
    let goal = read_form(sub, blank)?;
    validate::goal(&goal, today)?;
    ledger.goals = ledger.goals.add(goal);
    ledger.save(conn)?;
    if let Some(g) = ledger.goals.records().last() {
        info!(id = g.id, name = %g.name, target = %g.target_amount, "goal added");
        println!(
            "Goal #{} '{}' targets {} by {}",
            g.id,
            g.name,
            fmt_money(&g.target_amount),
            g.target_date
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut ledger = Ledger::load(conn)?;
    let mut goal = ledger
        .goals
        .get(id)
        .cloned()
        .ok_or_else(|| Error::not_found(RecordKind::Goal, id))?;
    if let Some(p) = sub.get_one::<bool>("priority") {
        goal.priority = *p;
    }
    let goal = read_form(sub, goal)?;
    validate::goal(&goal, today())?;
    ledger.goals = ledger.goals.replace_by_id(id, goal)?;
    ledger.save(conn)?;
    info!(id, "goal edited");
    println!("Updated goal #{}", id);
    Ok(())
}

/// Validates a contribution against the ceiling and folds it into its goal.
pub fn contribute_to(
    ledger: &mut Ledger,
    settings: &Settings,
    contribution: &Contribution,
) -> Result<()> {
    validate::contribution(contribution, settings.contribution_ceiling)?;
    ledger.goals = apply_contribution(&ledger.goals, contribution)?;
    Ok(())
}

fn contribute(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let mut ledger = Ledger::load(conn)?;
    let contribution = Contribution {
        goal_id: *sub.get_one::<i64>("id").unwrap(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        note: sub
            .get_one::<String>("note")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        date: now(),
        kind: if sub.get_flag("automatic") {
            ContributionKind::Automatic
        } else {
            ContributionKind::Manual
        },
    };
    contribute_to(&mut ledger, &settings, &contribution)?;
    ledger.save(conn)?;
    if let Some(g) = ledger.goals.get(contribution.goal_id) {
        info!(
            goal_id = g.id,
            amount = %contribution.amount,
            kind = %contribution.kind,
            "contribution recorded"
        );
        println!(
            "Added {} to '{}': {} of {} ({})",
            fmt_money(&contribution.amount),
            g.name,
            fmt_money(&g.current_amount),
            fmt_money(&g.target_amount),
            fmt_pct(&g.progress_pct())
        );
        if g.is_completed() {
            println!("Goal '{}' is fully funded", g.name);
        }
    }
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut ledger = Ledger::load(conn)?;
    ledger.goals = ledger.goals.remove_by_id(id)?;
    ledger.save(conn)?;
    info!(id, "goal removed");
    println!("Removed goal #{}", id);
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = Ledger::load(conn)?;
    let s = goal_summary(ledger.goals.records(), today());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let next = s
            .next_deadline
            .and_then(|id| ledger.goals.get(id))
            .map(|g| format!("{} ({})", g.name, g.target_date))
            .unwrap_or_default();
        println!(
            "{}",
            pretty_table(
                &[
                    "Target", "Saved", "Remaining", "Progress", "Active", "Completed", "Monthly",
                    "Next deadline",
                ],
                vec![vec![
                    fmt_money(&s.total_target),
                    fmt_money(&s.total_saved),
                    fmt_money(&s.total_remaining),
                    fmt_pct(&s.overall_progress),
                    s.active.to_string(),
                    s.completed.to_string(),
                    fmt_money(&s.average_monthly_required),
                    next,
                ]],
            )
        );
    }
    Ok(())
}
