// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SettingsBackend;
use crate::tutorial::{TOTAL_STEPS, TutorialProgress};
use crate::utils::{fmt_pct, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let mut progress = TutorialProgress::load(SettingsBackend::new(conn))?;
    match m.subcommand() {
        Some(("status", sub)) => {
            let snap = progress.snapshot();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &snap)? {
                let rows: Vec<Vec<String>> = snap
                    .completed_steps
                    .iter()
                    .map(|s| vec![s.clone(), progress.note(s).unwrap_or_default().to_string()])
                    .collect();
                println!("{}", pretty_table(&["Completed step", "Note"], rows));
                let orphan_notes: Vec<Vec<String>> = snap
                    .notes
                    .iter()
                    .filter(|(step, _)| !progress.is_completed(step))
                    .map(|(step, text)| vec![step.clone(), text.clone()])
                    .collect();
                if !orphan_notes.is_empty() {
                    println!("{}", pretty_table(&["Step", "Note"], orphan_notes));
                }
                println!(
                    "{} of {} steps ({})",
                    snap.completed_steps.len(),
                    TOTAL_STEPS,
                    fmt_pct(&snap.percent_complete)
                );
            }
        }
        Some(("complete", sub)) => {
            let step = sub.get_one::<String>("step").unwrap().trim();
            if progress.complete_step(step)? {
                info!(step, "guide step completed");
                println!(
                    "Completed '{}' ({})",
                    step,
                    fmt_pct(&progress.percent_complete(TOTAL_STEPS))
                );
            } else {
                println!("'{}' was already completed", step);
            }
        }
        Some(("note", sub)) => {
            let step = sub.get_one::<String>("step").unwrap().trim();
            let text = sub.get_one::<String>("text").unwrap();
            progress.set_note(step, text)?;
            match progress.note(step) {
                Some(_) => println!("Saved note for '{}'", step),
                None => println!("Cleared note for '{}'", step),
            }
        }
        Some(("reset", _)) => {
            progress.reset()?;
            info!("guide progress reset");
            println!("Guide progress cleared");
        }
        _ => {}
    }
    Ok(())
}
