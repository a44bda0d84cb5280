//! Monday-starting week grid.
//!
//! # Invariants
//! - A window always starts on a Monday and spans exactly seven dates.
//! - Every date belongs to exactly one window.
//! - `shift(n)` then `shift(-n)` returns the original window.
//! - A shift past the calendar range yields `None`, never a panic.
//! - Slot contents keep collection order; no sorting is applied.

use crate::model::assignment::Assignment;
use crate::view::ViewState;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

const DAYS_PER_WEEK: i64 = 7;

/// Seven consecutive dates starting on a Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WeekWindow {
    start: NaiveDate,
}

impl WeekWindow {
    /// Window containing `anchor`. Sundays belong to the week that started
    /// six days earlier.
    pub fn containing(anchor: NaiveDate) -> Self {
        let offset = i64::from(anchor.weekday().num_days_from_monday());
        Self {
            start: anchor - Duration::days(offset),
        }
    }

    /// Monday of this window.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Sunday of this window.
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(DAYS_PER_WEEK - 1)
    }

    /// Mon..Sun dates.
    pub fn dates(&self) -> [NaiveDate; 7] {
        let mut dates = [self.start; 7];
        for (offset, date) in dates.iter_mut().enumerate() {
            *date = self.start + Duration::days(offset as i64);
        }
        dates
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.slot_index(date).is_some()
    }

    /// Slot index (`0` = Monday) of `date`, if it falls inside this window.
    pub fn slot_index(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.start).num_days();
        if (0..DAYS_PER_WEEK).contains(&offset) {
            Some(offset as usize)
        } else {
            None
        }
    }

    /// Moves the window by `weeks` whole weeks (negative goes back).
    ///
    /// `None` when the shifted window would leave the representable
    /// calendar.
    pub fn shift(&self, weeks: i32) -> Option<Self> {
        let start = self
            .start
            .checked_add_signed(Duration::days(i64::from(weeks) * DAYS_PER_WEEK))?;
        start.checked_add_signed(Duration::days(DAYS_PER_WEEK - 1))?;
        Some(Self { start })
    }

    pub fn next(&self) -> Option<Self> {
        self.shift(1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.shift(-1)
    }

    /// Header text such as `Mar 10 - 16, 2025` or `Mar 31 - Apr 6, 2025`.
    ///
    /// The year is taken from the window start.
    pub fn range_label(&self) -> String {
        let end = self.end();
        let start_month = self.start.format("%b");
        if self.start.month() == end.month() {
            format!(
                "{start_month} {} - {}, {}",
                self.start.day(),
                end.day(),
                self.start.year()
            )
        } else {
            format!(
                "{start_month} {} - {} {}, {}",
                self.start.day(),
                end.format("%b"),
                end.day(),
                self.start.year()
            )
        }
    }
}

/// One day column of the week grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekSlot {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub is_today: bool,
    pub assignments: Vec<Assignment>,
}

impl WeekSlot {
    /// Short day header (`Mon`..`Sun`).
    pub fn label(&self) -> &'static str {
        match self.weekday {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}

/// Week grid for one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    pub window: WeekWindow,
    pub range_label: String,
    /// Always seven slots, Monday first.
    pub slots: Vec<WeekSlot>,
}

impl WeekView {
    pub fn assignment_count(&self) -> usize {
        self.slots.iter().map(|slot| slot.assignments.len()).sum()
    }
}

/// Buckets assignments into the seven days of `window`.
///
/// `Empty` when no assignment falls inside the window.
pub fn week_view(
    assignments: &[Assignment],
    window: WeekWindow,
    today: NaiveDate,
) -> ViewState<WeekView> {
    let mut slots: Vec<WeekSlot> = window
        .dates()
        .into_iter()
        .map(|date| WeekSlot {
            date,
            weekday: date.weekday(),
            is_today: date == today,
            assignments: Vec::new(),
        })
        .collect();

    for assignment in assignments {
        if let Some(index) = window.slot_index(assignment.due_date) {
            slots[index].assignments.push(assignment.clone());
        }
    }

    let view = WeekView {
        window,
        range_label: window.range_label(),
        slots,
    };
    if view.assignment_count() == 0 {
        ViewState::Empty
    } else {
        ViewState::Ready(view)
    }
}

#[cfg(test)]
mod tests {
    use super::WeekWindow;
    use chrono::{Datelike, NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sunday_belongs_to_previous_monday() {
        let window = WeekWindow::containing(date(2025, 3, 16));
        assert_eq!(window.start(), date(2025, 3, 10));
        assert_eq!(window.start().weekday(), Weekday::Mon);
    }

    #[test]
    fn monday_anchor_starts_its_own_week() {
        let window = WeekWindow::containing(date(2025, 3, 10));
        assert_eq!(window.start(), date(2025, 3, 10));
        assert_eq!(window.end(), date(2025, 3, 16));
    }

    #[test]
    fn range_label_formats_same_and_cross_month() {
        assert_eq!(
            WeekWindow::containing(date(2025, 3, 12)).range_label(),
            "Mar 10 - 16, 2025"
        );
        assert_eq!(
            WeekWindow::containing(date(2025, 4, 2)).range_label(),
            "Mar 31 - Apr 6, 2025"
        );
    }

    #[test]
    fn slot_index_rejects_dates_outside_window() {
        let window = WeekWindow::containing(date(2025, 3, 12));
        assert_eq!(window.slot_index(date(2025, 3, 9)), None);
        assert_eq!(window.slot_index(date(2025, 3, 17)), None);
        assert_eq!(window.slot_index(date(2025, 3, 16)), Some(6));
    }

    #[test]
    fn shift_past_calendar_range_is_none() {
        let window = WeekWindow::containing(date(2025, 3, 12));
        assert_eq!(window.shift(i32::MAX), None);
        assert_eq!(window.shift(i32::MIN), None);
        assert_eq!(window.shift(-2).and_then(|w| w.shift(2)), Some(window));
    }
}
