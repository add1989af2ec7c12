//! # Gantt Schedule
//!
//! The schedule engine behind a municipal budget and project dashboard.
//!
//! Task records come in one at a time from a manual entry form or in bulk from
//! an uploaded schedule file. Both paths normalize into a validated
//! [`TaskRecord`]; records accumulate in a session-owned [`TaskCollection`];
//! and [`derive`] projects the collection into a [`TimelineTable`] with the
//! computed duration and emergency-buffered end date of every task, ready for
//! a chart renderer.
//!
//! ## Data flow
//!
//! ```text
//! form fields ─ normalize_manual ─┐
//!                                 ├─> TaskCollection ─ derive ─> TimelineTable ─> renderer
//! schedule.csv ─ read_schedule ───┘
//! ```
//!
//! ## Schedule files
//!
//! Imports and exports share one canonical CSV schema,
//! `Task, Resource, Start, End, Emergency Time, Price Spent`, with dates
//! written as `YYYY-MM-DD`. A file produced by [`template::export_csv`]
//! re-imports to the same records. Derived columns (`Duration`,
//! `End with Emergency`) in an uploaded file are ignored.
//!
//! ## Example
//!
//! ```
//! use gantt_schedule::{derive, normalize_manual, ManualEnd, ManualEntry, TaskCollection};
//!
//! let mut session = TaskCollection::new();
//! let entry = ManualEntry {
//!     task: "Design".into(),
//!     resource: "Team X".into(),
//!     start: "2024-03-01".into(),
//!     end: ManualEnd::Weeks(4),
//!     salary: Some(2000.0),
//!     emergency_time: Some(3),
//! };
//! session.append(normalize_manual(&entry).unwrap());
//!
//! let table = derive(&session);
//! assert_eq!(table.rows()[0].end.to_string(), "2024-03-29");
//! assert_eq!(table.rows()[0].end_with_emergency.to_string(), "2024-04-01");
//! ```

pub mod collection;
pub mod config;
pub mod csv;
pub mod error;
pub mod fields;
pub mod ingest;
pub mod logging;
pub mod report;
pub mod task;
pub mod template;
pub mod timeline;

pub use collection::TaskCollection;
pub use error::{GanttError, ImportError, ParseError, RowError, SchemaError, ValidationError};
pub use fields::{Column, ImportMode};
pub use ingest::{normalize_bulk, normalize_manual, BulkImport, ManualEnd, ManualEntry, RawRow};
pub use task::{EndSpec, TaskRecord};
pub use timeline::{derive, TimelineRow, TimelineTable};
