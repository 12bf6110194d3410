// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ordered, in-memory collections of one record kind.
//!
//! Every mutation borrows the current store and returns a new one, so a
//! caller can keep the previous value around for undo or comparison.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Record, RecordId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordStore<R> {
    records: Vec<R>,
    next_id: RecordId,
}

impl<R> Default for RecordStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

/// Builds a store seeded with `initial`, keeping its order and ids.
pub fn create_store<R: Record>(initial: Vec<R>) -> RecordStore<R> {
    RecordStore::new(initial)
}

impl<R: Record> RecordStore<R> {
    pub fn new(initial: Vec<R>) -> Self {
        let next_id = initial.iter().map(Record::id).max().unwrap_or(0) + 1;
        Self {
            records: initial,
            next_id,
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// The id the next added record will receive.
    pub fn next_id(&self) -> RecordId {
        self.next_id
    }

    fn position(&self, id: RecordId) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Error::not_found(R::KIND, id))
    }

    fn with_new_id(&self, mut record: R) -> (R, RecordId) {
        let id = self.next_id;
        record.set_id(id);
        (record, id + 1)
    }

    /// Appends `record` under a freshly assigned id.
    pub fn add(&self, record: R) -> Self {
        let (record, next_id) = self.with_new_id(record);
        debug!(kind = %R::KIND, id = record.id(), "append record");
        let mut records = self.records.clone();
        records.push(record);
        Self { records, next_id }
    }

    /// Inserts `record` at the front under a freshly assigned id.
    pub fn prepend(&self, record: R) -> Self {
        let (record, next_id) = self.with_new_id(record);
        debug!(kind = %R::KIND, id = record.id(), "prepend record");
        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.push(record);
        records.extend(self.records.iter().cloned());
        Self { records, next_id }
    }

    /// Appends several records in order, each under a fresh id.
    pub fn extend<I: IntoIterator<Item = R>>(&self, items: I) -> Self {
        items.into_iter().fold(self.clone(), |store, r| store.add(r))
    }

    /// Applies `patch` to a copy of the matching record. The id cannot be changed.
    pub fn update_by_id<F>(&self, id: RecordId, patch: F) -> Result<Self>
    where
        F: FnOnce(&mut R),
    {
        let idx = self.position(id)?;
        let mut records = self.records.clone();
        patch(&mut records[idx]);
        records[idx].set_id(id);
        debug!(kind = %R::KIND, id, "update record");
        Ok(Self {
            records,
            next_id: self.next_id,
        })
    }

    /// Overwrites the matching record with `replacement`, keeping its id and position.
    pub fn replace_by_id(&self, id: RecordId, replacement: R) -> Result<Self> {
        self.update_by_id(id, move |r| *r = replacement)
    }

    pub fn remove_by_id(&self, id: RecordId) -> Result<Self> {
        let idx = self.position(id)?;
        let mut records = self.records.clone();
        records.remove(idx);
        debug!(kind = %R::KIND, id, "remove record");
        Ok(Self {
            records,
            next_id: self.next_id,
        })
    }

    /// Removes every listed id. Fails without removing anything if one is absent.
    pub fn remove_many(&self, ids: &[RecordId]) -> Result<Self> {
        for id in ids {
            self.position(*id)?;
        }
        let records: Vec<R> = self
            .records
            .iter()
            .filter(|r| !ids.contains(&r.id()))
            .cloned()
            .collect();
        debug!(kind = %R::KIND, count = ids.len(), "remove records");
        Ok(Self {
            records,
            next_id: self.next_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordKind;
    use crate::models::{Budget, Frequency};
    use rust_decimal::Decimal;

    fn budget(id: RecordId, category: &str) -> Budget {
        Budget {
            id,
            category: category.into(),
            allocated: Decimal::from(100),
            spent: Decimal::ZERO,
            period: Frequency::Monthly,
            alert_threshold: Decimal::from(80),
            icon: String::new(),
            color: String::new(),
            weekly_spending: Default::default(),
        }
    }

    fn categories(store: &RecordStore<Budget>) -> Vec<&str> {
        store.records().iter().map(|b| b.category.as_str()).collect()
    }

    #[test]
    fn add_assigns_fresh_ids_and_leaves_original_untouched() {
        let store = create_store(vec![budget(3, "Groceries"), budget(7, "Rent")]);
        let added = store.add(budget(0, "Travel"));
        assert_eq!(store.len(), 2);
        assert_eq!(added.len(), 3);
        assert_eq!(added.records()[2].id, 8);
        assert_eq!(added.next_id(), 9);
    }

    #[test]
    fn prepend_puts_newest_first() {
        let store = create_store(vec![budget(1, "Groceries")]);
        let store = store.prepend(budget(0, "Travel"));
        assert_eq!(categories(&store), vec!["Travel", "Groceries"]);
        assert_eq!(store.records()[0].id, 2);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let store = create_store(vec![budget(1, "A"), budget(2, "B")]);
        let store = store.remove_by_id(2).unwrap().add(budget(0, "C"));
        assert_eq!(store.records()[1].id, 3);
    }

    #[test]
    fn update_keeps_id_and_position() {
        let store = create_store(vec![budget(1, "A"), budget(2, "B"), budget(3, "C")]);
        let updated = store
            .update_by_id(2, |b| {
                b.id = 99;
                b.category = "Bills".into();
            })
            .unwrap();
        assert_eq!(categories(&updated), vec!["A", "Bills", "C"]);
        assert_eq!(updated.records()[1].id, 2);
        assert_eq!(categories(&store), vec!["A", "B", "C"]);
    }

    #[test]
    fn missing_ids_are_reported() {
        let store = create_store(vec![budget(1, "A")]);
        assert_eq!(
            store.remove_by_id(5),
            Err(Error::NotFound {
                kind: RecordKind::Budget,
                id: 5
            })
        );
        assert!(store.replace_by_id(5, budget(5, "X")).is_err());
        assert!(store.remove_many(&[1, 5]).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_many_drops_all_listed() {
        let store = create_store(vec![budget(1, "A"), budget(2, "B"), budget(3, "C")]);
        let store = store.remove_many(&[1, 3]).unwrap();
        assert_eq!(categories(&store), vec!["B"]);
    }
}
