//! Schedule file schema: template export and bulk import.
//!
//! Export and import agree on one canonical schema, `Task, Resource, Start,
//! End, Emergency Time, Price Spent`. Derived timeline columns are never
//! written here, and are ignored if an uploaded file happens to contain them,
//! so a file written by `export_csv` re-imports to the same records.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::csv;
use crate::error::{ImportError, ParseError, SchemaError, ValidationError};
use crate::fields::Column;
use crate::ingest::{BulkImport, RawRow};
use crate::task::{EndSpec, TaskRecord};

/// File name of the downloadable template.
pub const TEMPLATE_FILE_NAME: &str = "gantt_chart_template.csv";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Example rows shipped in the template.
pub fn template_records() -> Vec<TaskRecord> {
    let example = |task: &str, resource: &str, start: (i32, u32, u32), end: (i32, u32, u32), buffer, price| {
        let start = NaiveDate::from_ymd_opt(start.0, start.1, start.2)?;
        let end = NaiveDate::from_ymd_opt(end.0, end.1, end.2)?;
        TaskRecord::new(task, resource, start, EndSpec::Date(end))
            .and_then(|r| r.with_emergency_time(buffer))
            .and_then(|r| r.with_price_spent(price))
            .ok()
    };
    [
        example("Task A", "Team 1", (2023, 1, 1), (2023, 1, 10), 2, 1000.0),
        example("Task B", "Team 2", (2023, 1, 5), (2023, 1, 20), 3, 1500.0),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Serialize records in the canonical schema.
///
/// Week-based records are written with their resolved end date; the week
/// count is not a column, so re-imported records carry no `duration_weeks`.
pub fn export_csv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    let mut out = String::new();
    csv::write_row(&mut out, &Column::CANONICAL.map(Column::header));
    for r in records {
        csv::write_row(
            &mut out,
            &[
                r.task().to_string(),
                r.resource().to_string(),
                r.start().format(DATE_FORMAT).to_string(),
                r.end().format(DATE_FORMAT).to_string(),
                r.emergency_time().to_string(),
                r.price_spent().to_string(),
            ],
        );
    }
    out
}

/// The template file contents.
pub fn template_csv() -> String {
    export_csv(&template_records())
}

/// Map header cells to columns, checking that the schema is usable.
fn resolve_header(cells: &[String]) -> Result<Vec<Option<Column>>, SchemaError> {
    let mut columns: Vec<Option<Column>> = Vec::with_capacity(cells.len());
    for cell in cells {
        let column = Column::from_header(cell);
        match column {
            Some(c) if columns.contains(&Some(c)) => return Err(SchemaError::DuplicateColumn(c)),
            Some(c) if c.is_derived() => debug!(column = %c, "ignoring derived column on import"),
            None => warn!(header = cell.as_str(), "ignoring unknown column"),
            Some(_) => {}
        }
        columns.push(column);
    }

    let missing: Vec<Column> = Column::REQUIRED
        .into_iter()
        .filter(|c| !columns.contains(&Some(*c)))
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns(missing));
    }
    Ok(columns)
}

/// Parse schedule text and normalize every data row.
///
/// Structural problems abort with an `ImportError`; per-row problems are
/// collected in the returned `BulkImport`.
pub fn read_schedule(text: &str) -> Result<BulkImport, ImportError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = csv::parse(text)?.into_iter();
    let header = records.next().ok_or(ParseError::Empty)?;
    let columns = resolve_header(&header.fields)?;

    let mut out = BulkImport::default();
    for (i, record) in records.enumerate() {
        let row = i + 1;
        if record.fields.len() != columns.len() {
            out.reject(
                row,
                ValidationError::FieldCount { expected: columns.len(), found: record.fields.len() },
            );
            continue;
        }
        let mut raw = RawRow::default();
        for (column, value) in columns.iter().zip(record.fields) {
            if let Some(column) = column {
                raw.set(*column, value);
            }
        }
        out.push_row(row, &raw);
    }

    info!(
        accepted = out.accepted.len(),
        rejected = out.rejected.len(),
        "schedule import finished"
    );
    Ok(out)
}

/// Like `read_schedule`, for raw bytes of an uploaded file.
pub fn read_schedule_bytes(bytes: &[u8]) -> Result<BulkImport, ImportError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ParseError::NotUtf8)?;
    read_schedule(text)
}

/// Read and import a schedule file from disk.
pub fn read_schedule_file(path: &Path) -> Result<BulkImport, ImportError> {
    let bytes = fs::read(path).map_err(|source| ImportError::Io { path: path.to_path_buf(), source })?;
    read_schedule_bytes(&bytes)
}

/// Write records to `path` in the canonical schema.
pub fn write_schedule_file<'a, I>(path: &Path, records: I) -> std::io::Result<()>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    fs::write(path, export_csv(records))
}

/// Write the template. A directory target gets `file_name` inside it.
pub fn write_template_file(target: &Path, file_name: &str) -> std::io::Result<PathBuf> {
    let path = if target.is_dir() { target.join(file_name) } else { target.to_path_buf() };
    fs::write(&path, template_csv())?;
    info!(path = %path.display(), "wrote schedule template");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::RowError;
    use crate::timeline::derive_records;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn template_has_canonical_header_and_examples() {
        let text = template_csv();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Task,Resource,Start,End,Emergency Time,Price Spent"));
        assert_eq!(lines.next(), Some("Task A,Team 1,2023-01-01,2023-01-10,2,1000"));
        assert_eq!(lines.next(), Some("Task B,Team 2,2023-01-05,2023-01-20,3,1500"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn template_round_trips() {
        let imported = read_schedule(&template_csv()).unwrap();
        assert!(imported.is_clean());
        assert_eq!(imported.accepted, template_records());
    }

    #[test]
    fn week_based_entries_round_trip() {
        let entry = crate::ingest::ManualEntry {
            task: "Design".into(),
            resource: "Team X".into(),
            start: "2024-03-01".into(),
            end: crate::ingest::ManualEnd::Weeks(4),
            salary: Some(2000.0),
            emergency_time: Some(3),
        };
        let record = crate::ingest::normalize_manual(&entry).unwrap();
        let back = read_schedule(&export_csv([&record])).unwrap();
        assert_eq!(back.accepted, vec![record]);
        assert_eq!(back.accepted[0].duration_weeks(), None);
    }

    #[test]
    fn awkward_values_round_trip() {
        let records = vec![
            TaskRecord::new("Road, \"phase\" 1", "", date("2024-02-28"), EndSpec::Date(date("2024-03-01")))
                .unwrap()
                .with_price_spent(1234.56)
                .unwrap(),
            TaskRecord::new("Bridge\nrepair", "Crew, North", date("2024-01-01"), EndSpec::Date(date("2024-01-01")))
                .unwrap()
                .with_emergency_time(30)
                .unwrap(),
        ];
        let imported = read_schedule(&export_csv(&records)).unwrap();
        assert_eq!(imported.accepted, records);
    }

    #[test]
    fn sample_scenario_derives_expected_row() {
        let text = "Task,Resource,Start,End,Emergency Time,Price Spent\n\
                    Task A,Team 1,2023-01-01,2023-01-10,2,1000\n";
        let imported = read_schedule(text).unwrap();
        let table = derive_records(&imported.accepted);
        assert_eq!(table.rows()[0].duration_days, 9);
        assert_eq!(table.rows()[0].end_with_emergency, date("2023-01-12"));
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let imported = read_schedule("task,resource,start,end\nSurvey,,2024-01-01,2024-01-03\n").unwrap();
        assert_eq!(imported.accepted.len(), 1);
        assert_eq!(imported.accepted[0].emergency_time(), 0);
        assert_eq!(imported.accepted[0].price_spent(), 0.0);
    }

    #[test]
    fn derived_columns_are_ignored_on_import() {
        let text = "Task,Resource,Start,End,Duration,End with Emergency,Emergency Time\n\
                    Task A,Team 1,2023-01-01,2023-01-10,999 days,2099-01-01,2\n";
        let imported = read_schedule(text).unwrap();
        let table = derive_records(&imported.accepted);
        assert_eq!(table.rows()[0].duration_days, 9);
        assert_eq!(table.rows()[0].end_with_emergency, date("2023-01-12"));
    }

    #[test]
    fn missing_required_column_aborts() {
        let err = read_schedule("Task,Start,Emergency Time\nA,2023-01-01,1\n").unwrap_err();
        assert!(matches!(
            err,
            ImportError::Schema(SchemaError::MissingColumns(ref cols)) if cols == &vec![Column::Resource, Column::End]
        ));
    }

    #[test]
    fn duplicate_column_aborts() {
        let err = read_schedule("Task,Resource,Start,End,task\n").unwrap_err();
        assert!(matches!(err, ImportError::Schema(SchemaError::DuplicateColumn(Column::Task))));
    }

    #[test]
    fn unreadable_input_is_a_parse_error() {
        assert!(matches!(read_schedule(""), Err(ImportError::Parse(ParseError::Empty))));
        assert!(matches!(read_schedule_bytes(&[0xff, 0xfe, 0x00]), Err(ImportError::Parse(ParseError::NotUtf8))));
        assert!(matches!(
            read_schedule("Task,Resource,Start,End\n\"A,x,2023-01-01,2023-01-02\n"),
            Err(ImportError::Parse(ParseError::UnterminatedQuote(2)))
        ));
    }

    #[test]
    fn bom_is_stripped() {
        let text = format!("\u{feff}{}", template_csv());
        assert_eq!(read_schedule(&text).unwrap().accepted.len(), 2);
    }

    #[test]
    fn empty_task_row_is_reported_by_index() {
        let text = "Task,Resource,Start,End\n\
                    A,T,2023-01-01,2023-01-02\n\
                    \n\
                    ,T,2023-01-01,2023-01-02\n\
                    C,T,2023-01-01,2023-01-02\n";
        let imported = read_schedule(text).unwrap();
        assert_eq!(imported.accepted.len(), 2);
        assert_eq!(imported.rejected, vec![RowError { row: 2, error: ValidationError::EmptyTask }]);
    }

    #[test]
    fn ragged_rows_are_rejected_individually() {
        let text = "Task,Resource,Start,End\nA,T,2023-01-01\nB,T,2023-01-01,2023-01-02\n";
        let imported = read_schedule(text).unwrap();
        assert_eq!(imported.accepted.len(), 1);
        assert_eq!(imported.rejected[0].row, 1);
        assert_eq!(imported.rejected[0].error, ValidationError::FieldCount { expected: 4, found: 3 });
    }

    #[test]
    fn files_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_template_file(dir.path(), TEMPLATE_FILE_NAME).unwrap();
        assert_eq!(path, dir.path().join(TEMPLATE_FILE_NAME));
        assert_eq!(read_schedule_file(&path).unwrap().accepted, template_records());

        let copy = dir.path().join("copy.csv");
        write_schedule_file(&copy, &template_records()).unwrap();
        assert_eq!(read_schedule_file(&copy).unwrap().accepted, template_records());

        let missing = dir.path().join("nope.csv");
        assert!(matches!(read_schedule_file(&missing), Err(ImportError::Io { .. })));
    }
}
