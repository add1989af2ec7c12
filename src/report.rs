//! Text, CSV and JSON renderings of a finished timeline table.
//!
//! These consume a `TimelineTable` only; nothing here touches ingestion or
//! derivation.

use chrono::NaiveDate;

use crate::csv;
use crate::fields::{Column, OutputFormat};
use crate::timeline::{TimelineRow, TimelineTable};

/// Widest bar the text renderer draws; larger requests are capped.
pub const MAX_CHART_WIDTH: usize = 1000;

/// Render a table in the requested format.
pub fn render(table: &TimelineTable, format: OutputFormat, chart_width: usize) -> Result<String, serde_json::Error> {
    Ok(match format {
        OutputFormat::Table => render_text(table, chart_width),
        OutputFormat::Json => serde_json::to_string_pretty(table)? + "\n",
        OutputFormat::Csv => render_csv(table),
    })
}

/// Timeline rows as CSV, derived columns included.
pub fn render_csv(table: &TimelineTable) -> String {
    let mut out = String::new();
    csv::write_row(
        &mut out,
        &[
            Column::Task.header(),
            Column::Resource.header(),
            Column::Start.header(),
            Column::End.header(),
            Column::EndWithEmergency.header(),
            Column::Duration.header(),
            Column::EmergencyTime.header(),
            Column::PriceSpent.header(),
        ],
    );
    for r in table {
        csv::write_row(
            &mut out,
            &[
                r.task.clone(),
                r.resource.clone(),
                r.start.to_string(),
                r.end.to_string(),
                r.end_with_emergency.to_string(),
                r.duration_days.to_string(),
                r.emergency_days.to_string(),
                r.price_spent.to_string(),
            ],
        );
    }
    out
}

/// Aligned table with a proportional bar per row.
///
/// `#` covers start..end and `+` the emergency buffer after it.
pub fn render_text(table: &TimelineTable, chart_width: usize) -> String {
    let Some((first, last)) = table.span() else {
        return "No tasks scheduled.\n".to_string();
    };
    let chart_width = chart_width.min(MAX_CHART_WIDTH);

    let mut out = format!(
        "{:<20} {:<12} {:<10} {:<10} {:>5} {:>4} {:>10}  {}\n",
        "Task", "Resource", "Start", "End+Buf", "Days", "Buf", "Cost", "Timeline"
    );
    for r in table {
        out.push_str(&format!(
            "{:<20} {:<12} {:<10} {:<10} {:>5} {:>4} {:>10}  {}\n",
            truncate(&r.task, 20),
            truncate(if r.resource.is_empty() { "-" } else { r.resource.as_str() }, 12),
            r.start,
            r.end_with_emergency,
            r.duration_days,
            r.emergency_days,
            format_cost(r.price_spent),
            bar(r, first, last, chart_width),
        ));
    }
    out.push_str(&format!(
        "{} task(s), {} to {}, total cost {}\n",
        table.len(),
        first,
        last,
        format_cost(table.total_price_spent())
    ));
    out
}

/// Draw one row's bar scaled onto `width` columns spanning `first..=last`.
pub fn bar(row: &TimelineRow, first: NaiveDate, last: NaiveDate, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let start = column(row.start, first, last, width);
    let end = column(row.end, first, last, width);
    let buffered = column(row.end_with_emergency, first, last, width);

    let mut cells = vec![' '; width];
    for c in cells.iter_mut().take(end + 1).skip(start) {
        *c = '#';
    }
    if row.end_with_emergency > row.end {
        for c in cells.iter_mut().take(buffered + 1).skip(end + 1) {
            *c = '+';
        }
    }
    let s: String = cells.into_iter().collect();
    format!("|{}|", s)
}

/// Map a date onto one of `width` columns spanning `first..=last`.
pub fn column(d: NaiveDate, first: NaiveDate, last: NaiveDate, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let total = i128::from((last - first).num_days().max(0)) + 1;
    let offset = i128::from((d - first).num_days());
    ((offset * width as i128) / total).clamp(0, width as i128 - 1) as usize
}

/// Format a cost for display; whole amounts without decimals.
pub fn format_cost(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
///
/// Control characters such as line breaks become spaces so the result stays
/// on one line.
pub fn truncate(s: &str, width: usize) -> String {
    let flat: String = s.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();
    if flat.chars().count() <= width {
        flat
    } else {
        let mut out: String = flat.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::TaskCollection;
    use crate::task::{EndSpec, TaskRecord};
    use crate::template::template_records;
    use crate::timeline::{derive, derive_records};

    fn table() -> TimelineTable {
        derive(&TaskCollection::from(template_records()))
    }

    #[test]
    fn empty_table_renders_a_notice() {
        assert_eq!(render_text(&TimelineTable::default(), 40), "No tasks scheduled.\n");
    }

    #[test]
    fn text_lists_every_row_in_order() {
        let text = render_text(&table(), 20);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("Task A"));
        assert!(lines[2].starts_with("Task B"));
        assert!(lines[3].contains("2023-01-01 to 2023-01-23"));
        assert!(lines[3].contains("total cost 2500"));
    }

    #[test]
    fn bars_mark_buffer_after_end() {
        let t = table();
        let (first, last) = t.span().unwrap();
        let bar_a = bar(&t.rows()[0], first, last, 23);
        assert_eq!(bar_a, "|##########++           |");
    }

    #[test]
    fn csv_output_carries_derived_columns() {
        let text = render_csv(&table());
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Task,Resource,Start,End,End with Emergency,Duration,Emergency Time,Price Spent")
        );
        assert_eq!(lines.next(), Some("Task A,Team 1,2023-01-01,2023-01-10,2023-01-12,9,2,1000"));
    }

    #[test]
    fn json_output_is_an_array() {
        let json = render(&table(), OutputFormat::Json, 0).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn truncate_and_cost_formatting() {
        assert_eq!(truncate("Resurfacing Main Street", 10), "Resurfaci…");
        assert_eq!(truncate("Short", 10), "Short");
        assert_eq!(format_cost(1000.0), "1000");
        assert_eq!(format_cost(12.5), "12.50");
    }

    #[test]
    fn huge_widths_are_capped() {
        let t = table();
        let text = render_text(&t, usize::MAX);
        let bar_line = text.lines().nth(1).unwrap();
        assert_eq!(bar_line.split('|').nth(1).map(str::len), Some(MAX_CHART_WIDTH));

        let (first, last) = t.span().unwrap();
        assert_eq!(column(first, first, last, usize::MAX), 0);
        assert!(column(last, first, last, usize::MAX) < usize::MAX);
    }

    #[test]
    fn multiline_names_stay_on_one_row() {
        let rows = derive_records(&[TaskRecord::new(
            "Bridge\nrepair",
            "Crew\r\n2",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            EndSpec::Weeks(1),
        )
        .unwrap()]);
        let text = render_text(&rows, 10);
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(1).unwrap().starts_with("Bridge repair"));
        assert_eq!(truncate("a\tb", 10), "a b");
    }
}
