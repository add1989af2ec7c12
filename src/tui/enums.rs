//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    Timeline,
    AddTask,
    Import,
    ImportReview,
    Help,
}

/// Which part of the import dialog has focus.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ImportFocus {
    Path,
    Mode,
}
