//! Today and full-list projections.
//!
//! # Invariants
//! - Today view: `due_date == today`, priority rank descending, stable.
//! - All view: filtered, then `(due instant asc, priority rank desc)`,
//!   stable for exact ties.
//! - The `overdue` filter compares dates only, unlike `is_overdue`.

use crate::model::assignment::Assignment;
use crate::schedule::classifier::{classify_within, default_due_soon_window, DueStatus};
use crate::view::ViewState;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Filter applied to the full list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentFilter {
    #[default]
    All,
    Pending,
    Completed,
    /// Pending and due strictly before today's date.
    Overdue,
}

impl AssignmentFilter {
    pub const ALL: [Self; 4] = [Self::All, Self::Pending, Self::Completed, Self::Overdue];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }

    pub fn matches(self, assignment: &Assignment, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !assignment.completed,
            Self::Completed => assignment.completed,
            Self::Overdue => !assignment.completed && assignment.due_date < today,
        }
    }
}

/// Unknown filter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilterError(pub String);

impl Display for UnknownFilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown filter `{}`; expected all|pending|completed|overdue",
            self.0
        )
    }
}

impl Error for UnknownFilterError {}

impl FromStr for AssignmentFilter {
    type Err = UnknownFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == normalized)
            .ok_or_else(|| UnknownFilterError(value.trim().to_string()))
    }
}

impl Display for AssignmentFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a list projection: the record plus its due flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewEntry {
    pub assignment: Assignment,
    pub status: DueStatus,
}

/// Pure projector parameterized by the "due soon" window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewProjector {
    soon_window: Duration,
}

impl Default for ViewProjector {
    fn default() -> Self {
        Self::new(default_due_soon_window())
    }
}

impl ViewProjector {
    pub fn new(soon_window: Duration) -> Self {
        Self { soon_window }
    }

    /// Assignments due on `now`'s date, highest priority first.
    pub fn today(
        &self,
        assignments: &[Assignment],
        now: NaiveDateTime,
    ) -> ViewState<Vec<ViewEntry>> {
        let today = now.date();
        let mut matched: Vec<&Assignment> = assignments
            .iter()
            .filter(|assignment| assignment.due_date == today)
            .collect();
        matched.sort_by(|a, b| b.priority_rank().cmp(&a.priority_rank()));
        ViewState::from_items(self.entries(matched, now))
    }

    /// Filtered list, soonest due first, then highest priority first.
    pub fn all(
        &self,
        assignments: &[Assignment],
        now: NaiveDateTime,
        filter: AssignmentFilter,
    ) -> ViewState<Vec<ViewEntry>> {
        let today = now.date();
        let mut matched: Vec<&Assignment> = assignments
            .iter()
            .filter(|assignment| filter.matches(assignment, today))
            .collect();
        matched.sort_by(|a, b| {
            a.due_instant()
                .cmp(&b.due_instant())
                .then_with(|| b.priority_rank().cmp(&a.priority_rank()))
        });
        ViewState::from_items(self.entries(matched, now))
    }

    fn entries(&self, matched: Vec<&Assignment>, now: NaiveDateTime) -> Vec<ViewEntry> {
        matched
            .into_iter()
            .map(|assignment| ViewEntry {
                status: classify_within(assignment, now, self.soon_window),
                assignment: assignment.clone(),
            })
            .collect()
    }
}

/// Today view with the default soon window.
pub fn today_view(assignments: &[Assignment], now: NaiveDateTime) -> ViewState<Vec<ViewEntry>> {
    ViewProjector::default().today(assignments, now)
}

/// All view with the default soon window.
pub fn all_view(
    assignments: &[Assignment],
    now: NaiveDateTime,
    filter: AssignmentFilter,
) -> ViewState<Vec<ViewEntry>> {
    ViewProjector::default().all(assignments, now, filter)
}

#[cfg(test)]
mod tests {
    use super::AssignmentFilter;

    #[test]
    fn filter_parses_case_insensitively() {
        assert_eq!(
            " Overdue ".parse::<AssignmentFilter>().unwrap(),
            AssignmentFilter::Overdue
        );
        assert!("late".parse::<AssignmentFilter>().is_err());
    }

    #[test]
    fn filter_names_round_trip() {
        for filter in AssignmentFilter::ALL {
            assert_eq!(filter.as_str().parse::<AssignmentFilter>().unwrap(), filter);
        }
    }
}
