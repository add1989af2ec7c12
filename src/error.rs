//! Error types for schedule ingestion and the command-line front end.
//!
//! Errors fall into three tiers. A `ValidationError` rejects a single record
//! and is recoverable. `SchemaError` and `ParseError` are structural and abort
//! the whole import they occur in. `GanttError` is what the binary reports.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::fields::Column;

/// A single record failed schema or consistency checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("task name must not be empty")]
    EmptyTask,
    #[error("missing value for '{0}'")]
    MissingField(Column),
    #[error("'{value}' is not a calendar date in {column} (expected YYYY-MM-DD)")]
    InvalidDate { column: Column, value: String },
    #[error("'{value}' is not a valid number in {column}")]
    InvalidNumber { column: Column, value: String },
    #[error("duration must be at least one week, got {0}")]
    NonPositiveDuration(u32),
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("emergency time must not be negative, got {0} days")]
    NegativeEmergencyTime(i64),
    #[error("cost must not be negative, got {0}")]
    NegativeCost(f64),
    #[error("date arithmetic overflowed for start {0}")]
    DateOverflow(NaiveDate),
    #[error("row has {found} fields but the header has {expected}")]
    FieldCount { expected: usize, found: usize },
}

/// A per-row rejection collected during bulk ingestion.
///
/// `row` is the 1-based index of the data row (header and blank lines excluded).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("row {row}: {error}")]
pub struct RowError {
    pub row: usize,
    pub error: ValidationError,
}

/// The header of a bulk input is structurally unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required column(s): {}", format_columns(.0))]
    MissingColumns(Vec<Column>),
    #[error("column '{0}' appears more than once")]
    DuplicateColumn(Column),
}

/// The input is not readable tabular data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("file is empty")]
    Empty,
    #[error("file is not valid UTF-8 text")]
    NotUtf8,
    #[error("unterminated quoted field starting on line {0}")]
    UnterminatedQuote(usize),
}

/// Why a whole import operation failed.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level error reported by the `gantt` binary.
#[derive(Error, Debug)]
pub enum GanttError {
    #[error("import of {} failed: {source}", .path.display())]
    Import { path: PathBuf, source: ImportError },
    #[error("{count} row(s) rejected in {} (strict mode)", .path.display())]
    Rejected { path: PathBuf, count: usize },
    #[error("invalid entry '{entry}': {reason}")]
    Entry { entry: String, reason: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("config error: {0}")]
    Config(String),
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| c.header())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_error_names_the_row() {
        let err = RowError { row: 3, error: ValidationError::EmptyTask };
        assert_eq!(err.to_string(), "row 3: task name must not be empty");
    }

    #[test]
    fn schema_error_lists_headers() {
        let err = SchemaError::MissingColumns(vec![Column::Start, Column::End]);
        assert_eq!(err.to_string(), "missing required column(s): Start, End");
    }
}
