//! Ingestion and normalization of raw task input.
//!
//! Raw values arrive either one record at a time from the manual entry form or
//! as many rows from an uploaded schedule. Both paths end in the same
//! validated `TaskRecord`. Bulk ingestion validates every row independently
//! and reports rejections instead of stopping at the first one.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{RowError, ValidationError};
use crate::fields::Column;
use crate::task::{EndSpec, TaskRecord};

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// Surrounding whitespace is ignored. Anything else, including unpadded
/// months and days, other separators or trailing time components, is
/// rejected rather than guessed at.
pub fn parse_date(s: &str, column: Column) -> Result<NaiveDate, ValidationError> {
    let s = s.trim();
    let invalid = || ValidationError::InvalidDate { column, value: s.to_string() };

    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| invalid())
}

/// The end of a manually entered task, as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualEnd {
    /// An explicit end date, still unparsed.
    Date(String),
    /// A duration in whole weeks.
    Weeks(u32),
}

/// Field values collected by the manual entry form.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualEntry {
    pub task: String,
    pub resource: String,
    pub start: String,
    pub end: ManualEnd,
    pub salary: Option<f64>,
    pub emergency_time: Option<u32>,
}

/// Turn one manual form submission into a record.
pub fn normalize_manual(entry: &ManualEntry) -> Result<TaskRecord, ValidationError> {
    // Name first, so an empty form reports the most obvious problem.
    if entry.task.trim().is_empty() {
        return Err(ValidationError::EmptyTask);
    }
    let start = parse_date(&entry.start, Column::Start)?;
    let end = match &entry.end {
        ManualEnd::Date(raw) => EndSpec::Date(parse_date(raw, Column::End)?),
        ManualEnd::Weeks(weeks) => EndSpec::Weeks(*weeks),
    };

    let mut record = TaskRecord::new(&entry.task, &entry.resource, start, end)?;
    if let Some(days) = entry.emergency_time {
        record = record.with_emergency_time(days)?;
    }
    if let Some(salary) = entry.salary {
        record = record.with_price_spent(salary)?;
    }
    Ok(record)
}

/// One row of a bulk schedule, cell values still unparsed.
///
/// `None` means the column is absent from the input; an empty string means
/// the cell is present but blank. Both count as missing for required fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub task: Option<String>,
    pub resource: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub emergency_time: Option<String>,
    pub price_spent: Option<String>,
}

impl RawRow {
    /// Store a cell under its column. Derived columns are dropped.
    pub fn set(&mut self, column: Column, value: String) {
        let slot = match column {
            Column::Task => &mut self.task,
            Column::Resource => &mut self.resource,
            Column::Start => &mut self.start,
            Column::End => &mut self.end,
            Column::EmergencyTime => &mut self.emergency_time,
            Column::PriceSpent => &mut self.price_spent,
            Column::Duration | Column::EndWithEmergency => return,
        };
        *slot = Some(value);
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn required(value: &Option<String>, column: Column) -> Result<&str, ValidationError> {
    present(value).ok_or(ValidationError::MissingField(column))
}

/// Validate a single bulk row.
pub fn normalize_row(row: &RawRow) -> Result<TaskRecord, ValidationError> {
    let task = present(&row.task).ok_or(ValidationError::EmptyTask)?;
    let start = parse_date(required(&row.start, Column::Start)?, Column::Start)?;
    let end = parse_date(required(&row.end, Column::End)?, Column::End)?;
    let resource = present(&row.resource).unwrap_or("");

    let mut record = TaskRecord::new(task, resource, start, EndSpec::Date(end))?;

    if let Some(raw) = present(&row.emergency_time) {
        record = record.with_emergency_time(parse_emergency_time(raw)?)?;
    }
    if let Some(raw) = present(&row.price_spent) {
        let price = raw.parse::<f64>().map_err(|_| ValidationError::InvalidNumber {
            column: Column::PriceSpent,
            value: raw.to_string(),
        })?;
        record = record.with_price_spent(price)?;
    }
    Ok(record)
}

/// Parse an emergency buffer cell as a whole, non-negative day count.
///
/// Spreadsheet tools often write integers as `2.0`; a fractional part of
/// exactly zero is accepted, anything else is not.
fn parse_emergency_time(raw: &str) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::InvalidNumber {
        column: Column::EmergencyTime,
        value: raw.to_string(),
    };

    let days: i64 = match raw.parse::<i64>() {
        Ok(days) => days,
        Err(_) => {
            let f = raw.parse::<f64>().map_err(|_| invalid())?;
            if !f.is_finite() || f.fract() != 0.0 || f.abs() > i64::MAX as f64 {
                return Err(invalid());
            }
            f as i64
        }
    };
    if days < 0 {
        return Err(ValidationError::NegativeEmergencyTime(days));
    }
    u32::try_from(days).map_err(|_| invalid())
}

/// Outcome of a bulk ingestion: what was kept and what was rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkImport {
    pub accepted: Vec<TaskRecord>,
    pub rejected: Vec<RowError>,
}

impl BulkImport {
    /// Whether every row was accepted.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Total number of rows seen.
    pub fn row_count(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    /// All-or-nothing policy: the accepted records only if nothing was rejected.
    pub fn into_strict(self) -> Result<Vec<TaskRecord>, Vec<RowError>> {
        if self.rejected.is_empty() {
            Ok(self.accepted)
        } else {
            Err(self.rejected)
        }
    }

    /// Record a rejection found before normalization (e.g. a ragged row).
    pub fn reject(&mut self, row: usize, error: ValidationError) {
        warn!(row, %error, "rejected schedule row");
        self.rejected.push(RowError { row, error });
    }

    /// Normalize a row and file the result under `row` (1-based).
    pub fn push_row(&mut self, row: usize, raw: &RawRow) {
        match normalize_row(raw) {
            Ok(record) => {
                debug!(row, task = record.task(), "accepted schedule row");
                self.accepted.push(record);
            }
            Err(error) => self.reject(row, error),
        }
    }
}

/// Normalize many rows; rows are numbered from 1 in input order.
pub fn normalize_bulk<'a, I>(rows: I) -> BulkImport
where
    I: IntoIterator<Item = &'a RawRow>,
{
    let mut out = BulkImport::default();
    for (i, raw) in rows.into_iter().enumerate() {
        out.push_row(i + 1, raw);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn row(task: &str, start: &str, end: &str) -> RawRow {
        RawRow {
            task: Some(task.to_string()),
            resource: Some("Team 1".to_string()),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            ..RawRow::default()
        }
    }

    fn manual(start: &str, end: ManualEnd) -> ManualEntry {
        ManualEntry {
            task: "Design".to_string(),
            resource: "Team X".to_string(),
            start: start.to_string(),
            end,
            salary: Some(2000.0),
            emergency_time: None,
        }
    }

    #[test]
    fn parse_date_accepts_iso_only() {
        assert_eq!(parse_date(" 2024-02-29 ", Column::Start).unwrap(), date("2024-02-29"));
        for bad in ["2023-02-29", "2023-1-05", "05/01/2023", "2023/01/05", "2023-01-05T00:00", "", "today"] {
            assert!(
                matches!(parse_date(bad, Column::Start), Err(ValidationError::InvalidDate { .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn manual_weeks_entry_derives_end() {
        let t = normalize_manual(&manual("2024-03-01", ManualEnd::Weeks(4))).unwrap();
        assert_eq!(t.end(), date("2024-03-29"));
        assert_eq!(t.price_spent(), 2000.0);
        assert_eq!(t.emergency_time(), 0);
    }

    #[test]
    fn manual_end_before_start_is_rejected() {
        let err = normalize_manual(&manual("2024-05-10", ManualEnd::Date("2024-05-05".into()))).unwrap_err();
        assert!(matches!(err, ValidationError::EndBeforeStart { .. }));
    }

    #[test]
    fn manual_rejects_bad_start_and_empty_name() {
        let err = normalize_manual(&manual("2024-13-01", ManualEnd::Weeks(1))).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDate { column: Column::Start, .. }));

        let mut entry = manual("2024-03-01", ManualEnd::Weeks(1));
        entry.task = String::new();
        assert_eq!(normalize_manual(&entry).unwrap_err(), ValidationError::EmptyTask);
    }

    #[test]
    fn manual_negative_salary_is_rejected() {
        let mut entry = manual("2024-03-01", ManualEnd::Weeks(1));
        entry.salary = Some(-5.0);
        assert_eq!(normalize_manual(&entry).unwrap_err(), ValidationError::NegativeCost(-5.0));
    }

    #[test]
    fn bulk_row_defaults_optional_fields() {
        let t = normalize_row(&row("Task A", "2023-01-01", "2023-01-10")).unwrap();
        assert_eq!(t.emergency_time(), 0);
        assert_eq!(t.price_spent(), 0.0);
        assert_eq!(t.end_with_emergency(), t.end());
    }

    #[test]
    fn bulk_row_reads_optional_fields() {
        let mut r = row("Task A", "2023-01-01", "2023-01-10");
        r.emergency_time = Some("2".into());
        r.price_spent = Some("1000".into());
        let t = normalize_row(&r).unwrap();
        assert_eq!(t.emergency_time(), 2);
        assert_eq!(t.price_spent(), 1000.0);
        assert_eq!(t.end_with_emergency(), date("2023-01-12"));
    }

    #[test]
    fn emergency_time_must_be_a_whole_non_negative_count() {
        assert_eq!(parse_emergency_time("3.0").unwrap(), 3);
        assert_eq!(parse_emergency_time("-1").unwrap_err(), ValidationError::NegativeEmergencyTime(-1));
        assert!(matches!(parse_emergency_time("1.5"), Err(ValidationError::InvalidNumber { .. })));
        assert!(matches!(parse_emergency_time("two"), Err(ValidationError::InvalidNumber { .. })));
    }

    #[test]
    fn bulk_row_missing_fields() {
        let mut r = row("Task A", "2023-01-01", "2023-01-10");
        r.end = None;
        assert_eq!(normalize_row(&r).unwrap_err(), ValidationError::MissingField(Column::End));

        let mut r = row("Task A", "2023-01-01", "2023-01-10");
        r.start = Some("  ".into());
        assert_eq!(normalize_row(&r).unwrap_err(), ValidationError::MissingField(Column::Start));

        let mut r = row("Task A", "2023-01-01", "2023-01-10");
        r.resource = None;
        assert_eq!(normalize_row(&r).unwrap().resource(), "");
    }

    #[test]
    fn bulk_is_partial_failure_tolerant() {
        let rows = vec![
            row("Task A", "2023-01-01", "2023-01-10"),
            row("Task B", "2023-01-05", "2023-01-20"),
            row("", "2023-02-01", "2023-02-10"),
            row("Task D", "2023-03-01", "2023-03-02"),
        ];
        let out = normalize_bulk(&rows);
        assert_eq!(out.accepted.len(), 3);
        assert_eq!(out.rejected, vec![RowError { row: 3, error: ValidationError::EmptyTask }]);
        assert_eq!(out.row_count(), 4);
        assert!(!out.is_clean());
        assert_eq!(out.into_strict().unwrap_err().len(), 1);
    }

    #[test]
    fn derived_cells_are_not_raw_input() {
        let mut r = row("Task A", "2023-01-01", "2023-01-10");
        r.set(Column::EndWithEmergency, "2030-01-01".into());
        r.set(Column::Duration, "99".into());
        assert_eq!(r, row("Task A", "2023-01-01", "2023-01-10"));
    }
}
