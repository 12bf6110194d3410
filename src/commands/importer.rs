// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::apply::apply_transaction_add;
use crate::ledger::Ledger;
use crate::models::{Transaction, TransactionKind, parse_tags};
use crate::utils::{parse_date, parse_decimal, parse_enum};
use crate::validate;
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use serde::Deserialize;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// One CSV line, matched by header name. Columns the export adds (such as
/// `id`) are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    description: String,
    amount: String,
    category: String,
    account: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    recurring: String,
}

fn to_transaction(row: CsvRow) -> Result<Transaction> {
    let signed = parse_decimal(row.amount.trim())
        .with_context(|| format!("Invalid amount '{}' for {}", row.amount, row.description))?;
    // without a type column the sign decides
    let kind = match row.kind.trim() {
        "" if signed.is_sign_negative() => TransactionKind::Expense,
        "" => TransactionKind::Income,
        k => parse_enum(k)?,
    };
    let notes = row.notes.trim();
    Ok(Transaction {
        id: 0,
        date: parse_date(row.date.trim())
            .with_context(|| format!("Invalid transaction date '{}'", row.date))?,
        description: row.description.trim().to_string(),
        category: parse_enum(&row.category)?,
        account: row.account.trim().to_lowercase(),
        amount: signed.abs(),
        kind,
        notes: (!notes.is_empty()).then(|| notes.to_string()),
        tags: parse_tags(&row.tags),
        recurring: match row.recurring.trim() {
            "" => None,
            f => Some(parse_enum(f)?),
        },
    })
}

/// Adds every row or none: the ledger is only saved once all rows pass.
pub fn import_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let mut ledger = Ledger::load(conn)?;
    let mut store = ledger.transactions.clone();
    let mut count = 0usize;
    for (idx, result) in rdr.deserialize::<CsvRow>().enumerate() {
        let line = idx + 2;
        let row = result.with_context(|| format!("Read CSV line {}", line))?;
        let tx = to_transaction(row).with_context(|| format!("CSV line {}", line))?;
        validate::transaction(&tx).with_context(|| format!("CSV line {}", line))?;
        store = apply_transaction_add(&store, tx)?;
        count += 1;
    }
    ledger.transactions = store;
    ledger.save(conn)?;
    info!(count, path, "imported transactions");
    println!("Imported {} transactions from {}", count, path);
    Ok(())
}
