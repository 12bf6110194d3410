// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The three record collections, saved as one JSON document.

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::{get_setting, set_setting};
use crate::models::{Budget, Goal, Transaction};
use crate::store::RecordStore;

pub const LEDGER_KEY: &str = "ledger";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ledger {
    pub transactions: RecordStore<Transaction>,
    pub budgets: RecordStore<Budget>,
    pub goals: RecordStore<Goal>,
}

impl Ledger {
    /// Loads the saved ledger, or an empty one on first run.
    pub fn load(conn: &Connection) -> Result<Self> {
        match get_setting(conn, LEDGER_KEY)? {
            None => Ok(Ledger::default()),
            Some(raw) => serde_json::from_str(&raw).context("Ledger document is corrupt"),
        }
    }

    pub fn save(&self, conn: &Connection) -> Result<()> {
        let raw = serde_json::to_string(self)?;
        set_setting(conn, LEDGER_KEY, &raw)?;
        debug!(
            transactions = self.transactions.len(),
            budgets = self.budgets.len(),
            goals = self.goals.len(),
            "saved ledger"
        );
        Ok(())
    }
}
