//! TUI entry point and terminal setup.

use std::{io, path::Path};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use gantt_schedule::config::GanttConfig;
use gantt_schedule::fields::ImportMode;

use crate::tui::app::App;

/// Initialise and run the schedule terminal user interface.
///
/// `file`, when given, is imported into the fresh session before the first frame.
pub fn run_tui(config: &GanttConfig, file: Option<&Path>) -> io::Result<()> {
    let mut app = App::new(config);
    if let Some(path) = file {
        app.import_file(path, ImportMode::Extend);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
