// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Interactive guide progress, kept in memory and mirrored to a key/value backend.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::aggregate::overall_progress;

pub const PROGRESS_KEY: &str = "financeflow-tutorial-progress";
pub const NOTES_KEY: &str = "financeflow-tutorial-notes";
pub const TOTAL_STEPS: usize = 25;

/// Persistent string storage for the guide state.
pub trait ProgressBackend {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl ProgressBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub completed_steps: Vec<String>,
    pub notes: BTreeMap<String, String>,
    pub percent_complete: Decimal,
}

/// Guide state bound to its backend. Every change is written through.
pub struct TutorialProgress<B: ProgressBackend> {
    backend: B,
    completed: Vec<String>,
    notes: BTreeMap<String, String>,
}

fn decode<T: serde::de::DeserializeOwned + Default>(key: &str, raw: Option<String>) -> T {
    match raw {
        None => T::default(),
        Some(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
            warn!(key, error = %e, "discarding unreadable tutorial state");
            T::default()
        }),
    }
}

impl<B: ProgressBackend> TutorialProgress<B> {
    /// Restores saved state. Missing or unreadable values start empty.
    pub fn load(backend: B) -> Result<Self> {
        let completed: Vec<String> = decode(PROGRESS_KEY, backend.load(PROGRESS_KEY)?);
        let notes = decode(NOTES_KEY, backend.load(NOTES_KEY)?);
        let mut deduped: Vec<String> = Vec::with_capacity(completed.len());
        for step in completed {
            if !deduped.contains(&step) {
                deduped.push(step);
            }
        }
        Ok(Self {
            backend,
            completed: deduped,
            notes,
        })
    }

    pub fn completed_steps(&self) -> &[String] {
        &self.completed
    }

    pub fn is_completed(&self, step: &str) -> bool {
        self.completed.iter().any(|s| s == step)
    }

    pub fn note(&self, step: &str) -> Option<&str> {
        self.notes.get(step).map(String::as_str)
    }

    /// Marks `step` done. Returns false when it already was.
    pub fn complete_step(&mut self, step: &str) -> Result<bool> {
        if self.is_completed(step) {
            return Ok(false);
        }
        self.completed.push(step.to_string());
        self.persist_progress()?;
        Ok(true)
    }

    /// Stores a note for `step`; blank text deletes it.
    pub fn set_note(&mut self, step: &str, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            self.notes.remove(step);
        } else {
            self.notes.insert(step.to_string(), text.to_string());
        }
        let raw = serde_json::to_string(&self.notes)?;
        self.backend.save(NOTES_KEY, &raw)
    }

    pub fn percent_complete(&self, total_steps: usize) -> Decimal {
        overall_progress(
            Decimal::from(self.completed.len()),
            Decimal::from(total_steps),
        )
        .min(Decimal::ONE_HUNDRED)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            completed_steps: self.completed.clone(),
            notes: self.notes.clone(),
            percent_complete: self.percent_complete(TOTAL_STEPS),
        }
    }

    /// Clears completed steps and notes both here and in the backend.
    pub fn reset(&mut self) -> Result<()> {
        self.completed.clear();
        self.notes.clear();
        self.backend.remove(PROGRESS_KEY)?;
        self.backend.remove(NOTES_KEY)
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    fn persist_progress(&mut self) -> Result<()> {
        let raw = serde_json::to_string(&self.completed)?;
        self.backend.save(PROGRESS_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn completion_is_idempotent_and_persisted() {
        let mut p = TutorialProgress::load(MemoryBackend::new()).unwrap();
        assert!(p.complete_step("create-budget").unwrap());
        assert!(!p.complete_step("create-budget").unwrap());
        assert!(p.complete_step("add-transaction").unwrap());
        let backend = p.into_backend();
        assert_eq!(
            backend.raw(PROGRESS_KEY),
            Some(r#"["create-budget","add-transaction"]"#)
        );
    }

    #[test]
    fn state_survives_reload() {
        let mut p = TutorialProgress::load(MemoryBackend::new()).unwrap();
        p.complete_step("welcome").unwrap();
        p.set_note("welcome", "read again later").unwrap();
        let p = TutorialProgress::load(p.into_backend()).unwrap();
        assert!(p.is_completed("welcome"));
        assert_eq!(p.note("welcome"), Some("read again later"));
        assert_eq!(p.percent_complete(TOTAL_STEPS), dec!(4));
    }

    #[test]
    fn blank_note_removes_it() {
        let mut p = TutorialProgress::load(MemoryBackend::new()).unwrap();
        p.set_note("goals", "x").unwrap();
        p.set_note("goals", "   ").unwrap();
        assert_eq!(p.note("goals"), None);
    }

    #[test]
    fn corrupt_values_load_empty() {
        let mut backend = MemoryBackend::new();
        backend.save(PROGRESS_KEY, "not json").unwrap();
        backend.save(NOTES_KEY, r#"{"a":"b"}"#).unwrap();
        let p = TutorialProgress::load(backend).unwrap();
        assert!(p.completed_steps().is_empty());
        assert_eq!(p.note("a"), Some("b"));
    }

    #[test]
    fn reset_clears_memory_and_backend() {
        let mut p = TutorialProgress::load(MemoryBackend::new()).unwrap();
        p.complete_step("welcome").unwrap();
        p.set_note("welcome", "hi").unwrap();
        p.reset().unwrap();
        assert!(p.completed_steps().is_empty());
        assert_eq!(p.percent_complete(TOTAL_STEPS), Decimal::ZERO);
        let backend = p.into_backend();
        assert_eq!(backend.raw(PROGRESS_KEY), None);
        assert_eq!(backend.raw(NOTES_KEY), None);
    }

    #[test]
    fn zero_total_steps_is_zero_percent() {
        let p = TutorialProgress::load(MemoryBackend::new()).unwrap();
        assert_eq!(p.percent_complete(0), Decimal::ZERO);
    }
}
