//! Task form handling for the terminal user interface.
//!
//! `TaskForm` collects the raw field values of one manual task entry. It does
//! no date or schedule validation itself: `to_entry` only converts the typed
//! number fields, and the resulting `ManualEntry` goes through the same
//! normalization as every other input.

use gantt_schedule::ingest::{ManualEnd, ManualEntry};

use crate::tui::input::InputField;

/// Global order constants for form fields.
pub const TASK_GLOBAL_ORDER: usize = 0;
pub const RESOURCE_GLOBAL_ORDER: usize = 1;
pub const START_GLOBAL_ORDER: usize = 2;
pub const END_MODE_GLOBAL_ORDER: usize = 3;
pub const END_GLOBAL_ORDER: usize = 4;
pub const SALARY_GLOBAL_ORDER: usize = 5;
pub const EMERGENCY_GLOBAL_ORDER: usize = 6;

/// How the form's end field is interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EndMode {
    Weeks,
    Date,
}

impl EndMode {
    pub fn label(self) -> &'static str {
        match self {
            EndMode::Weeks => "Duration (weeks)",
            EndMode::Date => "End date (YYYY-MM-DD)",
        }
    }
}

/// Manual task entry form.
pub struct TaskForm {
    pub task: InputField,
    pub resource: InputField,
    pub start: InputField,
    pub end: InputField,
    pub salary: InputField,
    pub emergency: InputField,
    pub end_mode: EndMode,
    pub current_field: usize,
}

impl TaskForm {
    /// Create an empty form, duration given in weeks.
    pub fn new() -> Self {
        let mut form = Self {
            task: InputField::new(),
            resource: InputField::new(),
            start: InputField::new(),
            end: InputField::new(),
            salary: InputField::new(),
            emergency: InputField::new(),
            end_mode: EndMode::Weeks,
            current_field: TASK_GLOBAL_ORDER,
        };
        form.update_active_field();
        form
    }

    /// Get mutable references to all text fields in visual order.
    pub fn fields_mut(&mut self) -> Vec<&mut InputField> {
        vec![
            &mut self.task,
            &mut self.resource,
            &mut self.start,
            // END_MODE at 3 is a selector
            &mut self.end,
            &mut self.salary,
            &mut self.emergency,
        ]
    }

    /// The text field under the cursor, if the cursor is on one.
    pub fn current_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TASK_GLOBAL_ORDER => Some(&mut self.task),
            RESOURCE_GLOBAL_ORDER => Some(&mut self.resource),
            START_GLOBAL_ORDER => Some(&mut self.start),
            END_GLOBAL_ORDER => Some(&mut self.end),
            SALARY_GLOBAL_ORDER => Some(&mut self.salary),
            EMERGENCY_GLOBAL_ORDER => Some(&mut self.emergency),
            _ => None,
        }
    }

    /// Get the total number of fields (text fields + selector).
    pub fn field_count(&self) -> usize {
        7
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % self.field_count();
        self.update_active_field();
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            self.field_count() - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    /// Update which field is currently active for editing.
    pub fn update_active_field(&mut self) {
        for field in self.fields_mut() {
            field.active = false;
        }
        if let Some(field) = self.current_input() {
            field.active = true;
        }
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.current_input() {
            field.handle_char(c);
        }
    }

    /// Handle backspace input for the currently active field.
    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.current_input() {
            field.handle_backspace();
        }
    }

    /// Handle delete input for the currently active field.
    pub fn handle_delete(&mut self) {
        if let Some(field) = self.current_input() {
            field.handle_delete();
        }
    }

    /// Handle left/right arrow keys for cursor movement or the end-mode selector.
    pub fn handle_left_right(&mut self, right: bool) {
        if self.current_field == END_MODE_GLOBAL_ORDER {
            self.end_mode = match self.end_mode {
                EndMode::Weeks => EndMode::Date,
                EndMode::Date => EndMode::Weeks,
            };
            self.end.clear();
            return;
        }
        if let Some(field) = self.current_input() {
            if right {
                field.move_cursor_right();
            } else {
                field.move_cursor_left();
            }
        }
    }

    /// Convert the raw field values into a manual entry.
    ///
    /// Only the number fields are parsed here; dates and schedule rules are
    /// checked by normalization.
    pub fn to_entry(&self) -> Result<ManualEntry, String> {
        let end = match self.end_mode {
            EndMode::Date => ManualEnd::Date(self.end.value.trim().to_string()),
            EndMode::Weeks => ManualEnd::Weeks(
                self.end
                    .value
                    .trim()
                    .parse()
                    .map_err(|_| "Duration must be a whole number of weeks".to_string())?,
            ),
        };
        let salary = match self.salary.value.trim() {
            "" => None,
            s => Some(s.parse::<f64>().map_err(|_| "Salary must be a number".to_string())?),
        };
        let emergency_time = match self.emergency.value.trim() {
            "" => None,
            s => Some(
                s.parse::<u32>()
                    .map_err(|_| "Emergency time must be a whole number of days".to_string())?,
            ),
        };

        Ok(ManualEntry {
            task: self.task.value.clone(),
            resource: self.resource.value.clone(),
            start: self.start.value.clone(),
            end,
            salary,
            emergency_time,
        })
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}
