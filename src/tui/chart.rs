//! Gantt bar view for the terminal user interface.
//!
//! Draws a finished `TimelineTable`: one line per row, the scheduled span in
//! gold and the emergency buffer in red. It reads the table only.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use gantt_schedule::report::{column, truncate};
use gantt_schedule::{TimelineRow, TimelineTable};

use crate::tui::colors::{DARK_RED, GOLD};

/// Width of the task label column.
pub const LABEL_WIDTH: usize = 18;

/// Build one chart line for `row`, bars scaled to `width` cells.
pub fn bar_line(row: &TimelineRow, span: (chrono::NaiveDate, chrono::NaiveDate), width: usize) -> Line<'static> {
    let (first, last) = span;
    let label = format!("{:<w$} ", truncate(&row.task, LABEL_WIDTH), w = LABEL_WIDTH);
    if width == 0 {
        return Line::from(label);
    }

    let start = column(row.start, first, last, width);
    let end = column(row.end, first, last, width);
    let buffered = if row.end_with_emergency > row.end {
        column(row.end_with_emergency, first, last, width).max(end + 1).min(width - 1)
    } else {
        end
    };

    let mut spans = vec![Span::raw(label), Span::raw(" ".repeat(start))];
    spans.push(Span::styled(" ".repeat(end - start + 1), Style::default().bg(GOLD)));
    if buffered > end {
        spans.push(Span::styled(" ".repeat(buffered - end), Style::default().bg(DARK_RED)));
    }
    spans.push(Span::raw(" ".repeat(width - 1 - buffered)));
    Line::from(spans)
}

/// Axis line naming the first and last dates of the chart.
pub fn axis_line(span: (chrono::NaiveDate, chrono::NaiveDate), width: usize) -> Line<'static> {
    let first = span.0.to_string();
    let last = span.1.to_string();
    let gap = width.saturating_sub(first.len() + last.len());
    Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH + 1)),
        Span::styled(first, Style::default().fg(Color::Cyan)),
        Span::raw(" ".repeat(gap)),
        Span::styled(last, Style::default().fg(Color::Cyan)),
    ])
}

/// All chart lines for a table; empty table, no lines.
pub fn chart_lines(table: &TimelineTable, width: usize) -> Vec<Line<'static>> {
    let Some(span) = table.span() else {
        return Vec::new();
    };
    let mut lines = vec![axis_line(span, width)];
    lines.extend(table.iter().map(|r| bar_line(r, span, width)));
    lines
}

/// Render the chart into `area`. Nothing is drawn inside the block for an empty table.
pub fn render_chart(f: &mut Frame, area: Rect, table: &TimelineTable, scroll: u16) {
    let width = (area.width as usize).saturating_sub(LABEL_WIDTH + 3);
    let title = Span::styled(
        "Gantt Chart (gold: scheduled, red: emergency buffer)",
        Style::default().add_modifier(Modifier::BOLD),
    );
    let paragraph = Paragraph::new(chart_lines(table, width))
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((scroll, 0));
    f.render_widget(paragraph, area);
}
