//! Due-status predicates for a single assignment.
//!
//! # Responsibility
//! - Answer "is this overdue / due today / due soon" for a given instant.
//! - Provide the single display badge renderers attach to a row.
//!
//! # Invariants
//! - `is_due_today` ignores completion state.
//! - `is_overdue` and `is_due_soon` are always `false` for completed work.
//! - The badge prefers "today" over "soon"; the booleans stay independent.

use crate::model::assignment::Assignment;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Default width of the "due soon" window.
pub fn default_due_soon_window() -> Duration {
    Duration::hours(24)
}

/// `true` when pending and the due instant is strictly before `now`.
pub fn is_overdue(assignment: &Assignment, now: NaiveDateTime) -> bool {
    !assignment.completed && assignment.due_instant() < now
}

/// `true` when the due date is the calendar date of `now`.
pub fn is_due_today(assignment: &Assignment, now: NaiveDateTime) -> bool {
    assignment.due_date == now.date()
}

/// `true` when pending and due in `(now, now + 24h]`.
pub fn is_due_soon(assignment: &Assignment, now: NaiveDateTime) -> bool {
    is_due_soon_within(assignment, now, default_due_soon_window())
}

/// `true` when pending and due in `(now, now + window]`.
pub fn is_due_soon_within(assignment: &Assignment, now: NaiveDateTime, window: Duration) -> bool {
    if assignment.completed {
        return false;
    }
    let due = assignment.due_instant();
    now < due
        && now
            .checked_add_signed(window)
            .map_or(true, |limit| due <= limit)
}

/// Independent due flags for one assignment at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DueStatus {
    pub overdue: bool,
    pub due_today: bool,
    pub due_soon: bool,
}

/// Highlight label shown next to a due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueBadge {
    DueToday,
    DueSoon,
}

impl DueBadge {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DueToday => "due-today",
            Self::DueSoon => "due-soon",
        }
    }
}

impl DueStatus {
    /// Badge for display: today wins over soon.
    pub fn badge(&self) -> Option<DueBadge> {
        if self.due_today {
            Some(DueBadge::DueToday)
        } else if self.due_soon {
            Some(DueBadge::DueSoon)
        } else {
            None
        }
    }
}

/// Computes all three flags with the default 24h soon window.
pub fn classify(assignment: &Assignment, now: NaiveDateTime) -> DueStatus {
    classify_within(assignment, now, default_due_soon_window())
}

pub fn classify_within(
    assignment: &Assignment,
    now: NaiveDateTime,
    soon_window: Duration,
) -> DueStatus {
    DueStatus {
        overdue: is_overdue(assignment, now),
        due_today: is_due_today(assignment, now),
        due_soon: is_due_soon_within(assignment, now, soon_window),
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, is_due_soon, is_due_today, is_overdue, DueBadge};
    use crate::model::assignment::{Assignment, AssignmentDraft, Priority};
    use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M").unwrap()
    }

    fn assignment(date: &str, time: &str) -> Assignment {
        let draft = AssignmentDraft::new("Essay", "ENG101", date)
            .with_due_time(time)
            .with_priority(Priority::High);
        Assignment::from_draft(&draft, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
            .unwrap()
    }

    #[test]
    fn overdue_uses_time_of_day() {
        let item = assignment("2025-03-10", "09:00");
        assert!(!is_overdue(&item, at("2025-03-10", "09:00")));
        assert!(is_overdue(&item, at("2025-03-10", "09:01")));
    }

    #[test]
    fn completed_items_are_never_overdue_or_soon_but_can_be_today() {
        let mut item = assignment("2025-03-10", "09:00");
        item.completed = true;
        let now = at("2025-03-10", "08:00");
        assert!(!is_overdue(&item, at("2025-03-11", "00:00")));
        assert!(!is_due_soon(&item, now));
        assert!(is_due_today(&item, now));
    }

    #[test]
    fn due_soon_window_is_open_closed() {
        let item = assignment("2025-03-11", "09:00");
        let now = at("2025-03-10", "09:00");
        assert!(is_due_soon(&item, now));
        assert!(!is_due_soon(&item, now - Duration::minutes(1)));
        assert!(!is_due_soon(&item, at("2025-03-11", "09:00")));
    }

    #[test]
    fn flags_can_overlap_and_badge_prefers_today() {
        let item = assignment("2025-03-10", "23:59");
        let status = classify(&item, at("2025-03-10", "10:00"));
        assert!(status.due_today);
        assert!(status.due_soon);
        assert!(!status.overdue);
        assert_eq!(status.badge(), Some(DueBadge::DueToday));
    }

    #[test]
    fn soon_badge_for_tomorrow_morning() {
        let item = assignment("2025-03-11", "08:00");
        let status = classify(&item, at("2025-03-10", "20:00"));
        assert_eq!(status.badge(), Some(DueBadge::DueSoon));
        assert_eq!(
            item.due_date,
            NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()
        );
    }
}
