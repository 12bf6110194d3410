// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::transaction_stats;
use crate::apply::{apply_transaction_add, apply_transaction_edit};
use crate::error::{Error, RecordKind};
use crate::filter::{DateRange, TransactionCriteria, apply_filters_at};
use crate::ledger::Ledger;
use crate::models::{Transaction, TransactionCategory, TransactionKind, parse_tags};
use crate::sort::{Direction, TransactionSortKey, sort_by};
use crate::utils::{
    fmt_money, maybe_print_json, opt_decimal, opt_enum, opt_filter, parse_date, parse_enum,
    pretty_table, today,
};
use crate::validate;
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("stats", sub)) => stats(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Reads the shared transaction filter flags.
pub fn criteria_from(sub: &clap::ArgMatches) -> Result<TransactionCriteria> {
    let date_range = match sub.get_one::<String>("range") {
        Some(r) => parse_enum::<DateRange>(r)?,
        None => DateRange::Custom {
            start: sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?,
            end: sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?,
        },
    };
    Ok(TransactionCriteria {
        search: sub.get_one::<String>("search").cloned(),
        category: opt_filter(sub, "category")?,
        account: sub.get_one::<String>("account").map(|s| s.trim().to_lowercase()),
        kind: opt_filter(sub, "type")?,
        date_range,
        amount_min: opt_decimal(sub, "min")?,
        amount_max: opt_decimal(sub, "max")?,
    })
}

/// Filtered, sorted and truncated view behind `tx list`.
pub fn query_rows(
    transactions: &[Transaction],
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<Vec<Transaction>> {
    let criteria = criteria_from(sub)?;
    let key: TransactionSortKey = opt_enum(sub, "sort")?.unwrap_or_default();
    let direction: Direction = opt_enum(sub, "order")?.unwrap_or(key.default_direction());
    let filtered = apply_filters_at(transactions, &criteria, today);
    let mut rows = sort_by(&filtered, key, direction);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let ledger = Ledger::load(conn)?;
    let data = query_rows(ledger.transactions.records(), sub, today())?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.description.clone(),
                    t.category.to_string(),
                    t.account_name().to_string(),
                    fmt_money(&t.signed_amount()),
                    t.recurring.map(|f| f.to_string()).unwrap_or_default(),
                    t.tags.join(", "),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Date", "Description", "Category", "Account", "Amount", "Recurring",
                    "Tags",
                ],
                rows,
            )
        );
    }
    Ok(())
}

/// Overlays the form flags present in `sub` onto `base`.
pub fn read_form(sub: &clap::ArgMatches, base: Transaction) -> Result<Transaction> {
    let mut t = base;
    if let Some(d) = sub.get_one::<String>("date") {
        t.date = parse_date(d)?;
    }
    if let Some(v) = sub.get_one::<String>("description") {
        t.description = v.trim().to_string();
    }
    if let Some(v) = opt_decimal(sub, "amount")? {
        t.amount = v;
    }
    if let Some(v) = opt_enum(sub, "category")? {
        t.category = v;
    }
    if let Some(v) = sub.get_one::<String>("account") {
        t.account = v.trim().to_lowercase();
    }
    if let Some(v) = opt_enum(sub, "type")? {
        t.kind = v;
    }
    if let Some(v) = sub.get_one::<String>("notes") {
        t.notes = Some(v.trim().to_string()).filter(|s| !s.is_empty());
    }
    if let Some(v) = sub.get_one::<String>("tags") {
        t.tags = parse_tags(v);
    }
    if let Some(v) = sub.get_one::<String>("recurring") {
        t.recurring = match v.trim() {
            "" | "none" => None,
            f => Some(parse_enum(f)?),
        };
    }
    Ok(t)
}

fn blank(date: NaiveDate) -> Transaction {
    Transaction {
        id: 0,
        date,
        description: String::new(),
        category: TransactionCategory::Other,
        account: String::new(),
        amount: Decimal::ZERO,
        kind: TransactionKind::Expense,
        notes: None,
        tags: Vec::new(),
        recurring: None,
    }
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut ledger = Ledger::load(conn)?;
    let tx = read_form(sub, blank(today()))?;
    validate::transaction(&tx)?;
    ledger.transactions = apply_transaction_add(&ledger.transactions, tx)?;
    ledger.save(conn)?;
    if let Some(t) = ledger.transactions.records().first() {
        info!(id = t.id, amount = %t.amount, kind = %t.kind, "transaction added");
        println!(
            "Recorded #{} {} on {} '{}' ({})",
            t.id,
            fmt_money(&t.signed_amount()),
            t.date,
            t.description,
            t.account_name()
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut ledger = Ledger::load(conn)?;
    let current = ledger
        .transactions
        .get(id)
        .cloned()
        .ok_or_else(|| Error::not_found(RecordKind::Transaction, id))?;
    let tx = read_form(sub, current)?;
    validate::transaction(&tx)?;
    ledger.transactions = apply_transaction_edit(&ledger.transactions, id, tx)?;
    ledger.save(conn)?;
    info!(id, "transaction edited");
    println!("Updated transaction #{}", id);
    Ok(())
}

/// Deletes every listed id, or nothing when one of them is unknown.
fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ids: Vec<i64> = sub.get_many::<i64>("ids").unwrap().copied().collect();
    let mut ledger = Ledger::load(conn)?;
    ledger.transactions = ledger.transactions.remove_many(&ids)?;
    ledger.save(conn)?;
    info!(?ids, "transactions removed");
    let listed: Vec<String> = ids.iter().map(|id| format!("#{}", id)).collect();
    println!("Removed transaction {}", listed.join(", "));
    Ok(())
}

fn stats(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = Ledger::load(conn)?;
    let s = transaction_stats(ledger.transactions.records(), today());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        println!(
            "{}",
            pretty_table(
                &["Income", "Expenses", "Net", "Trend", "Count"],
                vec![vec![
                    fmt_money(&s.total_income),
                    fmt_money(&s.total_expenses),
                    fmt_money(&s.net_income),
                    s.trend().to_string(),
                    s.count.to_string(),
                ]],
            )
        );
    }
    Ok(())
}
