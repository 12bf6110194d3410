// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User-tunable numbers, stored as `config.*` rows in the settings table.

use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::aggregate::Thresholds;
use crate::db::{get_setting, set_setting};
use crate::utils::parse_decimal;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Income budget templates are expanded against.
    pub monthly_income: Decimal,
    /// Largest single goal contribution accepted.
    pub contribution_ceiling: Decimal,
    pub warning_threshold: Decimal,
    pub exceeded_threshold: Decimal,
    /// Alert threshold given to budgets created from a template.
    pub default_alert_threshold: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            monthly_income: Decimal::from(5000),
            contribution_ceiling: Decimal::from(10000),
            warning_threshold: Decimal::from(80),
            exceeded_threshold: Decimal::ONE_HUNDRED,
            default_alert_threshold: Decimal::from(80),
        }
    }
}

pub const KEYS: &[&str] = &[
    "monthly_income",
    "contribution_ceiling",
    "warning_threshold",
    "exceeded_threshold",
    "default_alert_threshold",
];

fn storage_key(key: &str) -> String {
    format!("config.{}", key)
}

impl Settings {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            warning: self.warning_threshold,
            exceeded: self.exceeded_threshold,
        }
    }

    pub fn get(&self, key: &str) -> Result<Decimal> {
        let v = match key {
            "monthly_income" => self.monthly_income,
            "contribution_ceiling" => self.contribution_ceiling,
            "warning_threshold" => self.warning_threshold,
            "exceeded_threshold" => self.exceeded_threshold,
            "default_alert_threshold" => self.default_alert_threshold,
            other => return Err(unknown_key(other)),
        };
        Ok(v)
    }

    fn slot(&mut self, key: &str) -> Result<&mut Decimal> {
        let v = match key {
            "monthly_income" => &mut self.monthly_income,
            "contribution_ceiling" => &mut self.contribution_ceiling,
            "warning_threshold" => &mut self.warning_threshold,
            "exceeded_threshold" => &mut self.exceeded_threshold,
            "default_alert_threshold" => &mut self.default_alert_threshold,
            other => return Err(unknown_key(other)),
        };
        Ok(v)
    }

    /// Reads every key, falling back to the default for missing or bad rows.
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut settings = Settings::default();
        for key in KEYS {
            if let Some(raw) = get_setting(conn, &storage_key(key))? {
                match parse_decimal(&raw) {
                    Ok(v) => *settings.slot(key)? = v,
                    Err(e) => warn!(key, error = %e, "ignoring unreadable setting"),
                }
            }
        }
        Ok(settings)
    }

    /// Validates and stores one value, returning the updated settings.
    pub fn set(conn: &Connection, key: &str, raw: &str) -> Result<Self> {
        let mut settings = Settings::load(conn)?;
        let value = parse_decimal(raw.trim())?;
        *settings.slot(key)? = value;
        settings.check().with_context(|| format!("Refusing to set {}={}", key, value))?;
        set_setting(conn, &storage_key(key), &value.to_string())?;
        Ok(settings)
    }

    fn check(&self) -> Result<()> {
        if self.monthly_income <= Decimal::ZERO {
            return Err(anyhow!("monthly_income must be greater than 0"));
        }
        if self.contribution_ceiling <= Decimal::ZERO {
            return Err(anyhow!("contribution_ceiling must be greater than 0"));
        }
        if self.warning_threshold > self.exceeded_threshold {
            return Err(anyhow!("warning_threshold cannot exceed exceeded_threshold"));
        }
        if !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&self.default_alert_threshold) {
            return Err(anyhow!("default_alert_threshold must be between 0 and 100"));
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow!("Unknown setting '{}' (expected one of: {})", key, KEYS.join(", "))
}
