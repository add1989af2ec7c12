//! Main application logic for the terminal user interface.
//!
//! The `App` owns one session's `TaskCollection`. Form submissions append to
//! it, file imports replace or extend it as the user chooses, and every frame
//! derives a fresh timeline table from it for the table and chart views.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::{info, warn};

use gantt_schedule::config::GanttConfig;
use gantt_schedule::fields::{format_import_mode, ImportMode};
use gantt_schedule::ingest::{normalize_manual, BulkImport};
use gantt_schedule::report::{format_cost, truncate};
use gantt_schedule::template::{read_schedule_file, write_template_file};
use gantt_schedule::{derive, TaskCollection};

use crate::tui::{
    chart::render_chart,
    colors::{DARK_GREEN, DARK_PURPLE, GOLD},
    enums::{AppState, ImportFocus},
    input::InputField,
    task_form::{
        TaskForm, EMERGENCY_GLOBAL_ORDER, END_GLOBAL_ORDER, END_MODE_GLOBAL_ORDER,
        RESOURCE_GLOBAL_ORDER, SALARY_GLOBAL_ORDER, START_GLOBAL_ORDER, TASK_GLOBAL_ORDER,
    },
    utils::centered_rect,
};

/// An import with rejected rows, waiting for the user's keep-or-abort decision.
struct PendingImport {
    path: PathBuf,
    mode: ImportMode,
    import: BulkImport,
}

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    collection: TaskCollection,
    table_state: TableState,
    task_form: TaskForm,
    import_path: InputField,
    import_mode: ImportMode,
    import_focus: ImportFocus,
    pending_import: Option<PendingImport>,
    status_message: String,
    chart_scroll: u16,
    template_dir: PathBuf,
    template_file_name: String,
}

impl App {
    /// Create a new App with an empty session.
    pub fn new(config: &GanttConfig) -> Self {
        App {
            state: AppState::Timeline,
            collection: TaskCollection::new(),
            table_state: TableState::default(),
            task_form: TaskForm::new(),
            import_path: InputField::new(),
            import_mode: config.import.mode,
            import_focus: ImportFocus::Path,
            pending_import: None,
            status_message: String::new(),
            chart_scroll: 0,
            template_dir: PathBuf::from("."),
            template_file_name: config.template.file_name.clone(),
        }
    }

    /// The session's task collection.
    pub fn collection(&self) -> &TaskCollection {
        &self.collection
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Import a schedule file. A clean file is applied at once; a file with
    /// rejected rows opens the review screen.
    pub fn import_file(&mut self, path: &Path, mode: ImportMode) {
        match read_schedule_file(path) {
            Err(e) => {
                warn!(path = %path.display(), error = %e, "import failed");
                self.state = AppState::Timeline;
                self.set_status_message(format!("Import failed: {}", e));
            }
            Ok(import) if import.is_clean() => {
                self.apply_import(PendingImport { path: path.to_path_buf(), mode, import });
            }
            Ok(import) => {
                self.pending_import = Some(PendingImport { path: path.to_path_buf(), mode, import });
                self.state = AppState::ImportReview;
            }
        }
    }

    fn apply_import(&mut self, pending: PendingImport) {
        let count = pending.import.accepted.len();
        info!(path = %pending.path.display(), count, mode = ?pending.mode, "applying import");
        self.collection.load(pending.mode, pending.import.accepted);
        self.state = AppState::Timeline;
        self.table_state.select(if self.collection.is_empty() { None } else { Some(0) });
        self.set_status_message(format!(
            "{}: {} task(s) from {}",
            format_import_mode(pending.mode),
            count,
            pending.path.display()
        ));
    }

    /// Normalize the form and append the record to the session.
    fn create_task(&mut self) -> Result<(), String> {
        let entry = self.task_form.to_entry()?;
        let record = normalize_manual(&entry).map_err(|e| e.to_string())?;
        info!(task = record.task(), "added task from form");
        self.collection.append(record);
        self.table_state.select(Some(self.collection.len() - 1));
        Ok(())
    }

    fn write_template(&mut self) {
        match write_template_file(&self.template_dir, &self.template_file_name) {
            Ok(path) => self.set_status_message(format!("Template written to {}", path.display())),
            Err(e) => self.set_status_message(format!("Failed to write template: {}", e)),
        }
    }

    fn select_offset(&mut self, forward: bool) {
        let len = self.collection.len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let next = match (self.table_state.selected(), forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(len - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        self.table_state.select(Some(next));
    }

    /// Handle keyboard input in the timeline view.
    ///
    /// Returns true if the application should quit.
    fn handle_timeline_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Down | KeyCode::Char('j') => self.select_offset(true),
            KeyCode::Up | KeyCode::Char('k') => self.select_offset(false),
            KeyCode::PageDown => self.chart_scroll = self.chart_scroll.saturating_add(5),
            KeyCode::PageUp => self.chart_scroll = self.chart_scroll.saturating_sub(5),
            KeyCode::Char('a') => {
                self.task_form = TaskForm::new();
                self.state = AppState::AddTask;
            }
            KeyCode::Char('i') => {
                self.import_focus = ImportFocus::Path;
                self.state = AppState::Import;
            }
            KeyCode::Char('t') => self.write_template(),
            KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    /// Handle keyboard input while the task form is open.
    fn handle_form_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.state = AppState::Timeline,
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => match self.create_task() {
                Ok(()) => {
                    self.state = AppState::Timeline;
                    self.set_status_message("Task added".to_string());
                }
                Err(e) => self.set_status_message(format!("Error: {}", e)),
            },
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    /// Handle keyboard input in the import dialog.
    fn handle_import_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.state = AppState::Timeline,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.import_focus = match self.import_focus {
                    ImportFocus::Path => ImportFocus::Mode,
                    ImportFocus::Mode => ImportFocus::Path,
                };
            }
            KeyCode::Enter => {
                let raw = self.import_path.value.trim().to_string();
                if raw.is_empty() {
                    self.set_status_message("Enter a file path".to_string());
                    return;
                }
                self.import_file(Path::new(&raw), self.import_mode);
            }
            _ => match self.import_focus {
                ImportFocus::Mode => {
                    if matches!(key, KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')) {
                        self.import_mode = self.import_mode.toggled();
                    }
                }
                ImportFocus::Path => match key {
                    KeyCode::Left => self.import_path.move_cursor_left(),
                    KeyCode::Right => self.import_path.move_cursor_right(),
                    KeyCode::Backspace => self.import_path.handle_backspace(),
                    KeyCode::Delete => self.import_path.handle_delete(),
                    KeyCode::Char(c) => self.import_path.handle_char(c),
                    _ => {}
                },
            },
        }
    }

    /// Handle the keep-or-abort decision for an import with rejected rows.
    fn handle_review_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('y') => {
                if let Some(pending) = self.pending_import.take() {
                    self.apply_import(pending);
                }
            }
            KeyCode::Esc | KeyCode::Char('n') => {
                self.pending_import = None;
                self.state = AppState::Timeline;
                self.set_status_message("Import aborted; session unchanged".to_string());
            }
            _ => {}
        }
    }

    /// Dispatch one key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        self.clear_status_message();
        match self.state {
            AppState::Timeline => return self.handle_timeline_input(key.code),
            AppState::AddTask => self.handle_form_input(key.code),
            AppState::Import => self.handle_import_input(key.code),
            AppState::ImportReview => self.handle_review_input(key.code),
            AppState::Help => self.state = AppState::Timeline,
        }
        false
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }
        Ok(false)
    }

    /// Render the timeline view: header, table of derived rows, chart.
    fn render_timeline(&mut self, f: &mut Frame, area: Rect) {
        let table = derive(&self.collection);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Percentage(40),
                Constraint::Min(5),
            ])
            .split(area);

        let span_text = match table.span() {
            Some((first, last)) => format!("{} to {}", first, last),
            None => "no tasks yet".to_string(),
        };
        let header_text = vec![Line::from(vec![
            Span::styled("PROJECT SCHEDULE", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!(
                    "Tasks: {}  Span: {}  Total cost: {}",
                    table.len(),
                    span_text,
                    format_cost(table.total_price_spent())
                ),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];
        let header = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, chunks[0]);

        let header_cells = ["#", "Task", "Resource", "Start", "End", "End+Buffer", "Days", "Buffer", "Cost"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header_row = Row::new(header_cells)
            .style(Style::default().bg(DARK_GREEN).fg(Color::White))
            .height(1);

        let rows: Vec<Row> = table
            .iter()
            .enumerate()
            .map(|(i, r)| {
                Row::new(vec![
                    Cell::from((i + 1).to_string()),
                    Cell::from(truncate(&r.task, 24)),
                    Cell::from(if r.resource.is_empty() { "-".to_string() } else { truncate(&r.resource, 14) }),
                    Cell::from(r.start.to_string()),
                    Cell::from(r.end.to_string()),
                    Cell::from(r.end_with_emergency.to_string()),
                    Cell::from(r.duration_days.to_string()),
                    Cell::from(r.emergency_days.to_string()),
                    Cell::from(format_cost(r.price_spent)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Min(16),
            Constraint::Length(14),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Length(10),
        ];
        let task_table = Table::new(rows, widths)
            .header(header_row)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Timeline - Press 'h' for help"),
            )
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");
        f.render_stateful_widget(task_table, chunks[1], &mut self.table_state);

        render_chart(f, chunks[2], &table, self.chart_scroll);
    }

    /// Render the manual entry form.
    fn render_task_form(&mut self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(70, 80, area);
        f.render_widget(Clear, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Task
                Constraint::Length(3), // Resource
                Constraint::Length(3), // Start
                Constraint::Length(3), // End mode
                Constraint::Length(3), // End / weeks
                Constraint::Length(3), // Salary
                Constraint::Length(3), // Emergency time
                Constraint::Min(1),    // Instructions
            ])
            .margin(1)
            .split(popup);

        f.render_widget(
            Block::default().borders(Borders::ALL).title("Add Task"),
            popup,
        );

        let end_label = self.task_form.end_mode.label();
        let text_fields = [
            (TASK_GLOBAL_ORDER, "Task *", &self.task_form.task),
            (RESOURCE_GLOBAL_ORDER, "Resource", &self.task_form.resource),
            (START_GLOBAL_ORDER, "Start date * (YYYY-MM-DD)", &self.task_form.start),
            (END_GLOBAL_ORDER, end_label, &self.task_form.end),
            (SALARY_GLOBAL_ORDER, "Salary", &self.task_form.salary),
            (EMERGENCY_GLOBAL_ORDER, "Emergency time (days)", &self.task_form.emergency),
        ];

        let mut cursor = None;
        for (order, title, field) in text_fields {
            let focused = self.task_form.current_field == order;
            let style = if focused { Style::default().fg(GOLD) } else { Style::default() };
            let widget = Paragraph::new(field.value.as_str())
                .block(Block::default().borders(Borders::ALL).title(title).border_style(style));
            f.render_widget(widget, chunks[order]);
            if focused {
                cursor = Some((chunks[order], field.cursor));
            }
        }

        let selector_style = if self.task_form.current_field == END_MODE_GLOBAL_ORDER {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        };
        let selector = Paragraph::new(format!("< {} >", end_label))
            .block(Block::default().borders(Borders::ALL).title("End given as").border_style(selector_style));
        f.render_widget(selector, chunks[END_MODE_GLOBAL_ORDER]);

        let help = Paragraph::new(vec![
            Line::from("Tab/↑↓ move between fields, ←/→ on 'End given as' switches weeks/date"),
            Line::from("Enter adds the task, Esc cancels"),
        ])
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, chunks[7]);

        if let Some((chunk, pos)) = cursor {
            f.set_cursor_position((chunk.x + pos as u16 + 1, chunk.y + 1));
        }
    }

    /// Render the import dialog.
    fn render_import(&mut self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(70, 40, area);
        f.render_widget(Clear, popup);
        f.render_widget(Block::default().borders(Borders::ALL).title("Import Schedule"), popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(1)])
            .margin(1)
            .split(popup);

        let focus_style = |focus: ImportFocus| {
            if self.import_focus == focus { Style::default().fg(GOLD) } else { Style::default() }
        };
        let path = Paragraph::new(self.import_path.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("CSV file path")
                .border_style(focus_style(ImportFocus::Path)),
        );
        f.render_widget(path, chunks[0]);

        let mode_hint = match self.import_mode {
            ImportMode::Replace => "discard current tasks",
            ImportMode::Extend => "append to current tasks",
        };
        let mode = Paragraph::new(format!("< {} > ({})", format_import_mode(self.import_mode), mode_hint)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Mode")
                .border_style(focus_style(ImportFocus::Mode)),
        );
        f.render_widget(mode, chunks[1]);

        let help = Paragraph::new(vec![
            Line::from("Tab switches field, ←/→ on Mode toggles Replace/Extend"),
            Line::from("Enter imports, Esc cancels"),
        ])
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, chunks[2]);

        if self.import_focus == ImportFocus::Path {
            f.set_cursor_position((chunks[0].x + self.import_path.cursor as u16 + 1, chunks[0].y + 1));
        }
    }

    /// Render the review screen for an import with rejected rows.
    fn render_review(&mut self, f: &mut Frame, area: Rect) {
        let Some(pending) = &self.pending_import else {
            return;
        };
        let popup = centered_rect(80, 70, area);
        f.render_widget(Clear, popup);

        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "{}: {} row(s) accepted, {} rejected",
                    pending.path.display(),
                    pending.import.accepted.len(),
                    pending.import.rejected.len()
                ),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(pending.import.rejected.iter().map(|r| {
            Line::from(Span::styled(r.to_string(), Style::default().fg(Color::White).bg(DARK_PURPLE)))
        }));
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "Enter/y: {} the accepted rows   Esc/n: abort the import",
            format_import_mode(pending.mode).to_lowercase()
        )));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Rejected Rows"))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, popup);
    }

    /// Render the help screen.
    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(Span::styled("Schedule Help", bold)),
            Line::from(""),
            Line::from(Span::styled("Timeline View:", bold)),
            Line::from("  ↑/↓, k/j     Select row"),
            Line::from("  PgUp/PgDn    Scroll chart"),
            Line::from("  a            Add task"),
            Line::from("  i            Import schedule CSV (replace or extend)"),
            Line::from(format!("  t            Write {} to the current directory", self.template_file_name)),
            Line::from("  h/F1         Show this help"),
            Line::from("  q/Esc/Ctrl+C Quit (tasks are not saved)"),
            Line::from(""),
            Line::from(Span::styled("Task Form:", bold)),
            Line::from("  End is either a week count or a YYYY-MM-DD date"),
            Line::from("  Emergency time adds buffer days after the end date"),
            Line::from(""),
            Line::from(Span::styled("Schedule Files:", bold)),
            Line::from("  Columns: Task, Resource, Start, End, Emergency Time, Price Spent"),
            Line::from("  Dates as YYYY-MM-DD; Duration / End with Emergency columns are ignored"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help - Press any key to return"))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::Timeline => format!("Tasks: {} | Press 'h' for help", self.collection.len()),
                AppState::AddTask => "Add Task".to_string(),
                AppState::Import => "Import Schedule".to_string(),
                AppState::ImportReview => "Review Rejected Rows".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(DARK_GREEN).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to the view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        match self.state {
            AppState::Timeline => self.render_timeline(f, chunks[0]),
            AppState::AddTask => {
                self.render_timeline(f, chunks[0]);
                self.render_task_form(f, chunks[0]);
            }
            AppState::Import => {
                self.render_timeline(f, chunks[0]);
                self.render_import(f, chunks[0]);
            }
            AppState::ImportReview => {
                self.render_timeline(f, chunks[0]);
                self.render_review(f, chunks[0]);
            }
            AppState::Help => self.render_help(f, chunks[0]),
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
