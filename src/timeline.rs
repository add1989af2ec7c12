//! Timeline derivation.
//!
//! Projects a `TaskCollection` into a `TimelineTable`: one row per record, in
//! collection order, with the computed duration and the buffered end date.
//! The table is recomputed on demand and never stored.

use chrono::NaiveDate;
use serde::Serialize;

use crate::collection::TaskCollection;
use crate::task::TaskRecord;

/// One chart-ready row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub task: String,
    pub resource: String,
    pub start: NaiveDate,
    /// End before the emergency buffer, for renderers that shade the buffer.
    pub end: NaiveDate,
    pub end_with_emergency: NaiveDate,
    /// `end - start` in days.
    #[serde(rename = "duration")]
    pub duration_days: i64,
    #[serde(rename = "emergency_time")]
    pub emergency_days: u32,
    pub price_spent: f64,
}

impl TimelineRow {
    fn from_record(record: &TaskRecord) -> Self {
        TimelineRow {
            task: record.task().to_string(),
            resource: record.resource().to_string(),
            start: record.start(),
            end: record.end(),
            end_with_emergency: record.end_with_emergency(),
            duration_days: record.span_days(),
            emergency_days: record.emergency_time(),
            price_spent: record.price_spent(),
        }
    }
}

/// Render-ready projection of a task collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimelineTable {
    rows: Vec<TimelineRow>,
}

impl TimelineTable {
    pub fn rows(&self) -> &[TimelineRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimelineRow> {
        self.rows.iter()
    }

    /// Earliest start and latest buffered end across all rows.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.iter().map(|r| r.start).min()?;
        let last = self.rows.iter().map(|r| r.end_with_emergency).max()?;
        Some((first, last))
    }

    /// Sum of the cost column.
    pub fn total_price_spent(&self) -> f64 {
        self.rows.iter().map(|r| r.price_spent).sum()
    }
}

impl<'a> IntoIterator for &'a TimelineTable {
    type Item = &'a TimelineRow;
    type IntoIter = std::slice::Iter<'a, TimelineRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Derive the timeline table for a collection.
pub fn derive(tasks: &TaskCollection) -> TimelineTable {
    derive_records(tasks.records())
}

/// Derive the timeline table for a slice of records.
pub fn derive_records(records: &[TaskRecord]) -> TimelineTable {
    TimelineTable {
        rows: records.iter().map(TimelineRow::from_record).collect(),
    }
}
