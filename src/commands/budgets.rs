// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{StatusBucket, Thresholds, budget_summary};
use crate::config::Settings;
use crate::error::{Error, RecordKind};
use crate::filter::{BudgetCriteria, apply_filters};
use crate::ledger::Ledger;
use crate::models::{Budget, Frequency};
use crate::sort::{BudgetSortKey, Direction, sort_by};
use crate::templates::{TEMPLATES, expand_template, find_template};
use crate::utils::{
    fmt_money, fmt_pct, maybe_print_json, opt_decimal, opt_enum, opt_filter, parse_decimal,
    pretty_table,
};
use crate::validate;
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("templates", sub)) => templates(sub)?,
        Some(("apply-template", sub)) => apply_template(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// A budget together with the figures derived from it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRow {
    #[serde(flatten)]
    pub budget: Budget,
    pub percentage: Decimal,
    pub remaining: Decimal,
    pub status: StatusBucket,
    pub alert: bool,
}

pub fn query_rows(
    budgets: &[Budget],
    sub: &clap::ArgMatches,
    thresholds: Thresholds,
) -> Result<Vec<BudgetRow>> {
    let criteria = BudgetCriteria {
        search: sub.get_one::<String>("search").cloned(),
        status: opt_filter(sub, "status")?,
        period: opt_filter(sub, "period")?,
        thresholds,
    };
    let key: BudgetSortKey = opt_enum(sub, "sort")?.unwrap_or_default();
    let direction: Direction = opt_enum(sub, "order")?.unwrap_or_default();
    let filtered = apply_filters(budgets, &criteria);
    Ok(sort_by(&filtered, key, direction)
        .into_iter()
        .map(|b| BudgetRow {
            percentage: b.percentage(),
            remaining: b.remaining(),
            status: b.status(&thresholds),
            alert: b.alert_triggered(),
            budget: b,
        })
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let ledger = Ledger::load(conn)?;
    let data = query_rows(ledger.budgets.records(), sub, settings.thresholds())?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.budget.id.to_string(),
                    r.budget.category.clone(),
                    r.budget.period.to_string(),
                    fmt_money(&r.budget.allocated),
                    fmt_money(&r.budget.spent),
                    fmt_money(&r.remaining),
                    fmt_pct(&r.percentage),
                    r.status.to_string(),
                    if r.alert { "!".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Category", "Period", "Allocated", "Spent", "Remaining", "Used",
                    "Status", "Alert",
                ],
                rows,
            )
        );
    }
    Ok(())
}

/// Overlays the budget form flags present in `sub` onto `b`.
fn read_form(sub: &clap::ArgMatches, mut b: Budget) -> Result<Budget> {
    if let Some(v) = sub.get_one::<String>("category") {
        b.category = v.trim().to_string();
    }
    if let Some(v) = opt_decimal(sub, "allocated")? {
        b.allocated = v;
    }
    if let Some(v) = opt_decimal(sub, "spent")? {
        b.spent = v;
    }
    if let Some(v) = opt_enum(sub, "period")? {
        b.period = v;
    }
    if let Some(v) = opt_decimal(sub, "alert")? {
        b.alert_threshold = v;
    }
    Ok(b)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let mut ledger = Ledger::load(conn)?;
    let blank = Budget {
        id: 0,
        category: String::new(),
        allocated: Decimal::ZERO,
        spent: Decimal::ZERO,
        period: Frequency::Monthly,
        alert_threshold: settings.default_alert_threshold,
        icon: String::new(),
        color: String::new(),
        weekly_spending: Default::default(),
    };
    let budget = read_form(sub, blank)?;
    validate::budget(&budget)?;
    ledger.budgets = ledger.budgets.add(budget);
    ledger.save(conn)?;
    if let Some(b) = ledger.budgets.records().last() {
        info!(id = b.id, category = %b.category, "budget added");
        println!("Budget #{} {} = {} ({})", b.id, b.category, fmt_money(&b.allocated), b.period);
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut ledger = Ledger::load(conn)?;
    let current = ledger
        .budgets
        .get(id)
        .cloned()
        .ok_or_else(|| Error::not_found(RecordKind::Budget, id))?;
    let budget = read_form(sub, current)?;
    validate::budget(&budget)?;
    ledger.budgets = ledger.budgets.replace_by_id(id, budget)?;
    ledger.save(conn)?;
    info!(id, "budget edited");
    println!("Updated budget #{}", id);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut ledger = Ledger::load(conn)?;
    ledger.budgets = ledger.budgets.remove_by_id(id)?;
    ledger.save(conn)?;
    info!(id, "budget removed");
    println!("Removed budget #{}", id);
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let ledger = Ledger::load(conn)?;
    let s = budget_summary(ledger.budgets.records(), &settings.thresholds());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        println!(
            "{}",
            pretty_table(
                &[
                    "Allocated", "Spent", "Remaining", "Used", "Status", "On track", "Warning",
                    "Exceeded",
                ],
                vec![vec![
                    fmt_money(&s.total_allocated),
                    fmt_money(&s.total_spent),
                    fmt_money(&s.total_remaining),
                    fmt_pct(&s.overall_progress),
                    s.overall_status.to_string(),
                    s.counts.on_track.to_string(),
                    s.counts.warning.to_string(),
                    s.counts.exceeded.to_string(),
                ]],
            )
        );
    }
    Ok(())
}

fn templates(sub: &clap::ArgMatches) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &TEMPLATES)? {
        let rows: Vec<Vec<String>> = TEMPLATES
            .iter()
            .map(|t| {
                let split = t
                    .lines
                    .iter()
                    .map(|l| format!("{} {}%", l.category, l.percentage))
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![t.id.to_string(), t.name.to_string(), t.description.to_string(), split]
            })
            .collect();
        println!("{}", pretty_table(&["ID", "Name", "Description", "Split"], rows));
    }
    Ok(())
}

/// Appends one budget per template line, sized against the monthly income.
pub fn apply_template(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("template").unwrap();
    let template =
        find_template(key).ok_or_else(|| anyhow!("Unknown budget template '{}'", key))?;
    let settings = Settings::load(conn)?;
    let income = match sub.get_one::<String>("income") {
        Some(v) => parse_decimal(v)?,
        None => settings.monthly_income,
    };
    if income <= Decimal::ZERO {
        return Err(Error::invalid("income", "Monthly income must be greater than 0").into());
    }
    let mut ledger = Ledger::load(conn)?;
    let budgets = expand_template(template, income, settings.default_alert_threshold);
    let added = budgets.len();
    ledger.budgets = ledger.budgets.extend(budgets);
    ledger.save(conn)?;
    info!(template = template.name, %income, added, "budget template applied");
    println!(
        "Applied '{}' against {}: {} budgets added",
        template.name,
        fmt_money(&income),
        added
    );
    Ok(())
}
