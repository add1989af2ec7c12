//! Enumerations and field types for schedule data.
//!
//! This module defines the column vocabulary of the tabular schedule format,
//! split into the canonical (raw input) columns and the derived columns that
//! only Timeline Derivation produces, plus the small option enums shared by
//! the CLI, the config file and the interactive session.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A named column of the schedule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Task,
    Resource,
    Start,
    End,
    EmergencyTime,
    PriceSpent,
    Duration,
    EndWithEmergency,
}

impl Column {
    /// The canonical raw schema, in export order.
    pub const CANONICAL: [Column; 6] = [
        Column::Task,
        Column::Resource,
        Column::Start,
        Column::End,
        Column::EmergencyTime,
        Column::PriceSpent,
    ];

    /// Columns an import cannot proceed without.
    pub const REQUIRED: [Column; 4] = [Column::Task, Column::Resource, Column::Start, Column::End];

    /// Header text as written on export.
    pub fn header(self) -> &'static str {
        match self {
            Column::Task => "Task",
            Column::Resource => "Resource",
            Column::Start => "Start",
            Column::End => "End",
            Column::EmergencyTime => "Emergency Time",
            Column::PriceSpent => "Price Spent",
            Column::Duration => "Duration",
            Column::EndWithEmergency => "End with Emergency",
        }
    }

    /// Whether the column is Timeline Derivation output rather than raw input.
    pub fn is_derived(self) -> bool {
        matches!(self, Column::Duration | Column::EndWithEmergency)
    }

    /// Match a header cell, ignoring case, spaces, underscores and hyphens.
    pub fn from_header(raw: &str) -> Option<Column> {
        let key: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "task" => Some(Column::Task),
            "resource" => Some(Column::Resource),
            "start" => Some(Column::Start),
            "end" => Some(Column::End),
            "emergencytime" => Some(Column::EmergencyTime),
            "pricespent" | "salary" => Some(Column::PriceSpent),
            "duration" => Some(Column::Duration),
            "endwithemergency" => Some(Column::EndWithEmergency),
            _ => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// How a bulk import combines with the records already in a session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ImportMode {
    /// Discard the current collection and keep only the imported records.
    Replace,
    /// Append the imported records after the current ones.
    #[default]
    Extend,
}

impl ImportMode {
    /// The other mode, used by the interactive toggle.
    pub fn toggled(self) -> Self {
        match self {
            ImportMode::Replace => ImportMode::Extend,
            ImportMode::Extend => ImportMode::Replace,
        }
    }
}

/// Format an import mode for display.
pub fn format_import_mode(mode: ImportMode) -> &'static str {
    match mode {
        ImportMode::Replace => "Replace",
        ImportMode::Extend => "Extend",
    }
}

/// Output formats for the timeline command.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table with bars.
    #[default]
    Table,
    /// Timeline rows as a JSON array.
    Json,
    /// Timeline rows as CSV, derived columns included.
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_matching_is_lenient() {
        assert_eq!(Column::from_header("Emergency Time"), Some(Column::EmergencyTime));
        assert_eq!(Column::from_header("emergency_time"), Some(Column::EmergencyTime));
        assert_eq!(Column::from_header(" EmergencyTime "), Some(Column::EmergencyTime));
        assert_eq!(Column::from_header("SALARY"), Some(Column::PriceSpent));
        assert_eq!(Column::from_header("End with Emergency"), Some(Column::EndWithEmergency));
        assert_eq!(Column::from_header("Notes"), None);
    }

    #[test]
    fn canonical_schema_has_no_derived_columns() {
        assert!(Column::CANONICAL.iter().all(|c| !c.is_derived()));
        for c in Column::CANONICAL {
            assert_eq!(Column::from_header(c.header()), Some(c));
        }
    }
}
