//! The session-scoped task collection.
//!
//! A `TaskCollection` is owned by whoever runs the session (the CLI command or
//! the interactive app) and passed explicitly to ingestion and derivation.
//! Insertion order is chart row order; nothing here sorts or deduplicates.

use serde::Serialize;
use tracing::info;

use crate::fields::ImportMode;
use crate::task::TaskRecord;

/// Ordered, append-only set of task records for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskCollection {
    records: Vec<TaskRecord>,
}

impl TaskCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single record, as a form submission does.
    pub fn append(&mut self, record: TaskRecord) {
        self.records.push(record);
    }

    /// Drop everything and keep only `records`.
    pub fn replace_with(&mut self, records: Vec<TaskRecord>) {
        info!(previous = self.records.len(), incoming = records.len(), "replacing task collection");
        self.records = records;
    }

    /// Append `records` after the existing ones, preserving their order.
    pub fn extend(&mut self, records: Vec<TaskRecord>) {
        info!(previous = self.records.len(), incoming = records.len(), "extending task collection");
        self.records.extend(records);
    }

    /// Load a bulk import using the caller's chosen mode.
    pub fn load(&mut self, mode: ImportMode, records: Vec<TaskRecord>) {
        match mode {
            ImportMode::Replace => self.replace_with(records),
            ImportMode::Extend => self.extend(records),
        }
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaskRecord> {
        self.records.iter()
    }
}

impl From<Vec<TaskRecord>> for TaskCollection {
    fn from(records: Vec<TaskRecord>) -> Self {
        TaskCollection { records }
    }
}

impl FromIterator<TaskRecord> for TaskCollection {
    fn from_iter<I: IntoIterator<Item = TaskRecord>>(iter: I) -> Self {
        TaskCollection { records: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a TaskCollection {
    type Item = &'a TaskRecord;
    type IntoIter = std::slice::Iter<'a, TaskRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Pure form of a form submission: returns the collection with `record` appended.
pub fn append(mut collection: TaskCollection, record: TaskRecord) -> TaskCollection {
    collection.append(record);
    collection
}
