// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate, NaiveDateTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Local calendar date used to resolve date presets and deadlines.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Parses one of the `FromStr` enums whose error type is a plain message.
pub fn parse_enum<T>(s: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    s.parse::<T>().map_err(|e| anyhow!(e))
}

/// Optional string argument parsed with [`parse_enum`].
pub fn opt_enum<T>(m: &clap::ArgMatches, id: &str) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    m.get_one::<String>(id).map(|s| parse_enum(s)).transpose()
}

/// Like [`opt_enum`], but a blank value or `all` means no filter.
pub fn opt_filter<T>(m: &clap::ArgMatches, id: &str) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    match m.get_one::<String>(id).map(|s| s.trim()) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => parse_enum(s).map(Some),
    }
}

pub fn opt_decimal(m: &clap::ArgMatches, id: &str) -> Result<Option<Decimal>> {
    m.get_one::<String>(id).map(|s| parse_decimal(s)).transpose()
}

pub fn fmt_money(d: &Decimal) -> String {
    let d = d.round_dp(2);
    if d.is_sign_negative() {
        format!("-${:.2}", d.abs())
    } else {
        format!("${:.2}", d)
    }
}

pub fn fmt_pct(d: &Decimal) -> String {
    format!("{:.1}%", d.round_dp(1))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
