//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Scheduled span of a task bar
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Emergency buffer segment after the scheduled end
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Header and status bar background
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Rejected rows in the import review
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);
