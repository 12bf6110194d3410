// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{KEYS, Settings};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => get(conn, sub)?,
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            let value = sub.get_one::<String>("value").unwrap();
            let settings = Settings::set(conn, key, value)?;
            let stored = settings.get(key)?;
            info!(key = %key, value = %stored, "setting updated");
            println!("{} = {}", key, stored);
        }
        _ => {}
    }
    Ok(())
}

fn get(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    if let Some(key) = sub.get_one::<String>("key") {
        println!("{}", settings.get(key)?);
        return Ok(());
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &settings)? {
        let rows = KEYS
            .iter()
            .map(|k| Ok(vec![k.to_string(), settings.get(k)?.to_string()]))
            .collect::<Result<Vec<_>>>()?;
        println!("{}", pretty_table(&["Key", "Value"], rows));
    }
    Ok(())
}
