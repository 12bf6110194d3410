// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::criteria_from;
use crate::filter::apply_filters_at;
use crate::ledger::Ledger;
use crate::sort::{Direction, TransactionSortKey, sort_by};
use crate::utils::today;
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use tracing::info;

pub const CSV_HEADERS: [&str; 10] = [
    "id",
    "date",
    "description",
    "category",
    "account",
    "type",
    "amount",
    "notes",
    "tags",
    "recurring",
];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// Writes the filtered transaction view, oldest first.
fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let criteria = criteria_from(sub)?;
    let ledger = Ledger::load(conn)?;
    let filtered = apply_filters_at(ledger.transactions.records(), &criteria, today());
    let rows = sort_by(&filtered, TransactionSortKey::Date, Direction::Asc);

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(CSV_HEADERS)?;
        for t in &rows {
            wtr.write_record([
                t.id.to_string(),
                t.date.to_string(),
                t.description.clone(),
                t.category.to_string(),
                t.account.clone(),
                t.kind.to_string(),
                t.amount.to_string(),
                t.notes.clone().unwrap_or_default(),
                t.tags.join(", "),
                t.recurring.map(|f| f.to_string()).unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    } else {
        std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
    }
    info!(count = rows.len(), format = %fmt, path = %out, "exported transactions");
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
