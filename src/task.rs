//! Task record data structure.
//!
//! This module defines `TaskRecord`, one schedulable unit of work with a name,
//! a resource and a date span. Records are only built through the validating
//! constructors here, so every value satisfies `end >= start` and carries a
//! representable buffered end date.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::error::ValidationError;
use crate::fields::Column;

/// How the end of a task is determined: an explicit date or a week count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndSpec {
    Date(NaiveDate),
    Weeks(u32),
}

/// A validated schedule entry.
///
/// Absent emergency time is stored as zero days and absent cost as zero, so
/// nothing downstream has to deal with missing values. Equality compares the
/// canonical schedule fields only; the week count an end date came from is
/// not part of it.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    task: String,
    resource: String,
    start: NaiveDate,
    end: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_weeks: Option<u32>,
    emergency_time: u32,
    price_spent: f64,
}

impl TaskRecord {
    /// Build a record with no emergency buffer and no cost.
    ///
    /// The task name is trimmed and must not be empty. A week count must be
    /// at least one and resolves to `start + weeks * 7` days.
    pub fn new(
        task: &str,
        resource: &str,
        start: NaiveDate,
        end: EndSpec,
    ) -> Result<Self, ValidationError> {
        let task = task.trim();
        if task.is_empty() {
            return Err(ValidationError::EmptyTask);
        }

        let (end, duration_weeks) = match end {
            EndSpec::Date(end) => (end, None),
            EndSpec::Weeks(0) => return Err(ValidationError::NonPositiveDuration(0)),
            EndSpec::Weeks(weeks) => {
                let end = start
                    .checked_add_days(Days::new(u64::from(weeks) * 7))
                    .ok_or(ValidationError::DateOverflow(start))?;
                (end, Some(weeks))
            }
        };
        if end < start {
            return Err(ValidationError::EndBeforeStart { start, end });
        }

        Ok(TaskRecord {
            task: task.to_string(),
            resource: resource.trim().to_string(),
            start,
            end,
            duration_weeks,
            emergency_time: 0,
            price_spent: 0.0,
        })
    }

    /// Attach an emergency buffer in days.
    pub fn with_emergency_time(mut self, days: u32) -> Result<Self, ValidationError> {
        self.end
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or(ValidationError::DateOverflow(self.start))?;
        self.emergency_time = days;
        Ok(self)
    }

    /// Attach a cost figure. Carried for display only.
    pub fn with_price_spent(mut self, price: f64) -> Result<Self, ValidationError> {
        if !price.is_finite() {
            return Err(ValidationError::InvalidNumber {
                column: Column::PriceSpent,
                value: price.to_string(),
            });
        }
        if price < 0.0 {
            return Err(ValidationError::NegativeCost(price));
        }
        self.price_spent = price;
        Ok(self)
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// The week count the end date was derived from, if any.
    pub fn duration_weeks(&self) -> Option<u32> {
        self.duration_weeks
    }

    /// Emergency buffer in days; zero when none was given.
    pub fn emergency_time(&self) -> u32 {
        self.emergency_time
    }

    pub fn price_spent(&self) -> f64 {
        self.price_spent
    }

    /// Length of the task in days, `end - start`. Never negative.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// End date pushed out by the emergency buffer.
    pub fn end_with_emergency(&self) -> NaiveDate {
        // Representability is checked in `with_emergency_time`.
        self.end
            .checked_add_days(Days::new(u64::from(self.emergency_time)))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl PartialEq for TaskRecord {
    fn eq(&self, other: &Self) -> bool {
        self.task == other.task
            && self.resource == other.resource
            && self.start == other.start
            && self.end == other.end
            && self.emergency_time == other.emergency_time
            && self.price_spent == other.price_spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn weeks_resolve_to_seven_day_multiples() {
        let t = TaskRecord::new("Design", "Team X", date("2024-03-01"), EndSpec::Weeks(4)).unwrap();
        assert_eq!(t.end(), date("2024-03-29"));
        assert_eq!(t.span_days(), 28);
        assert_eq!(t.duration_weeks(), Some(4));
    }

    #[test]
    fn zero_weeks_is_rejected() {
        let err = TaskRecord::new("Design", "", date("2024-03-01"), EndSpec::Weeks(0)).unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveDuration(0));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = TaskRecord::new("Paving", "", date("2024-05-10"), EndSpec::Date(date("2024-05-05")))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::EndBeforeStart { start: date("2024-05-10"), end: date("2024-05-05") }
        );
    }

    #[test]
    fn same_day_task_is_allowed() {
        let t = TaskRecord::new("Inspection", "", date("2024-05-10"), EndSpec::Date(date("2024-05-10")))
            .unwrap();
        assert_eq!(t.span_days(), 0);
    }

    #[test]
    fn blank_name_is_rejected_and_names_are_trimmed() {
        assert_eq!(
            TaskRecord::new("   ", "", date("2024-01-01"), EndSpec::Weeks(1)).unwrap_err(),
            ValidationError::EmptyTask
        );
        let t = TaskRecord::new("  Survey ", " Crew 2 ", date("2024-01-01"), EndSpec::Weeks(1)).unwrap();
        assert_eq!(t.task(), "Survey");
        assert_eq!(t.resource(), "Crew 2");
    }

    #[test]
    fn emergency_buffer_extends_end() {
        let t = TaskRecord::new("Task A", "Team 1", date("2023-01-01"), EndSpec::Date(date("2023-01-10")))
            .unwrap()
            .with_emergency_time(2)
            .unwrap();
        assert_eq!(t.end_with_emergency(), date("2023-01-12"));
        assert_eq!((t.end_with_emergency() - t.end()).num_days(), 2);
    }

    #[test]
    fn no_buffer_means_buffered_end_equals_end() {
        let t = TaskRecord::new("Task A", "", date("2023-01-01"), EndSpec::Weeks(1)).unwrap();
        assert_eq!(t.emergency_time(), 0);
        assert_eq!(t.end_with_emergency(), t.end());
    }

    #[test]
    fn negative_or_nan_cost_is_rejected() {
        let t = TaskRecord::new("Task A", "", date("2023-01-01"), EndSpec::Weeks(1)).unwrap();
        assert_eq!(t.clone().with_price_spent(-1.0).unwrap_err(), ValidationError::NegativeCost(-1.0));
        assert!(t.clone().with_price_spent(f64::NAN).is_err());
        assert_eq!(t.with_price_spent(2000.0).unwrap().price_spent(), 2000.0);
    }

    #[test]
    fn unrepresentable_buffer_is_rejected() {
        let t = TaskRecord::new("Late", "", NaiveDate::MAX, EndSpec::Date(NaiveDate::MAX)).unwrap();
        assert_eq!(t.with_emergency_time(1).unwrap_err(), ValidationError::DateOverflow(NaiveDate::MAX));
    }

    #[test]
    fn week_count_does_not_affect_equality() {
        let by_weeks = TaskRecord::new("Design", "Team X", date("2024-03-01"), EndSpec::Weeks(4)).unwrap();
        let by_date = TaskRecord::new("Design", "Team X", date("2024-03-01"), EndSpec::Date(date("2024-03-29")))
            .unwrap();
        assert_eq!(by_weeks, by_date);
        assert_ne!(by_weeks, by_date.with_emergency_time(1).unwrap());
    }
}
