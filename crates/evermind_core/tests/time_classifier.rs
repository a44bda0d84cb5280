use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use evermind_core::schedule::classifier::{classify_within, is_due_soon_within};
use evermind_core::{
    classify, is_due_soon, is_due_today, is_overdue, Assignment, AssignmentDraft, DueBadge,
};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn due(date: &str, time: &str) -> Assignment {
    let draft = AssignmentDraft::new("Essay", "ENG101", date).with_due_time(time);
    Assignment::from_draft(&draft, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()).unwrap()
}

#[test]
fn due_today_matches_calendar_date_regardless_of_completion() {
    let mut item = due("2025-03-10", "23:59");
    for hour in [0, 12, 23] {
        let now = at(2025, 3, 10, hour, 0);
        assert!(is_due_today(&item, now));
        item.completed = !item.completed;
        assert!(is_due_today(&item, now));
    }
    assert!(!is_due_today(&item, at(2025, 3, 11, 0, 0)));
    assert!(!is_due_today(&item, at(2025, 3, 9, 23, 59)));
}

#[test]
fn pending_overdue_iff_due_instant_before_now() {
    let item = due("2025-03-10", "14:00");
    let due_instant = item.due_instant();
    for offset in -3..=3 {
        let now = due_instant + Duration::minutes(offset);
        assert_eq!(is_overdue(&item, now), due_instant < now, "offset {offset}");
    }
}

#[test]
fn completed_work_is_never_overdue() {
    let mut item = due("2025-03-01", "08:00");
    item.completed = true;
    assert!(!is_overdue(&item, at(2025, 3, 20, 0, 0)));
}

#[test]
fn due_soon_upper_bound_is_inclusive() {
    let item = due("2025-03-11", "12:00");
    assert!(is_due_soon(&item, at(2025, 3, 10, 12, 0)));
    assert!(!is_due_soon(&item, at(2025, 3, 10, 11, 59)));
    assert!(is_due_soon(&item, at(2025, 3, 11, 11, 59)));
    assert!(!is_due_soon(&item, at(2025, 3, 11, 12, 0)));
}

#[test]
fn custom_window_narrows_due_soon() {
    let item = due("2025-03-11", "12:00");
    let now = at(2025, 3, 10, 20, 0);
    assert!(is_due_soon_within(&item, now, Duration::hours(24)));
    assert!(!is_due_soon_within(&item, now, Duration::hours(6)));
    assert!(!classify_within(&item, now, Duration::hours(6)).due_soon);
}

#[test]
fn overdue_today_keeps_today_badge() {
    let item = due("2025-03-10", "09:00");
    let status = classify(&item, at(2025, 3, 10, 18, 0));
    assert!(status.overdue);
    assert!(status.due_today);
    assert!(!status.due_soon);
    assert_eq!(status.badge(), Some(DueBadge::DueToday));
    assert_eq!(DueBadge::DueToday.as_str(), "due-today");
}

#[test]
fn far_future_has_no_badge() {
    let status = classify(&due("2025-04-01", "09:00"), at(2025, 3, 10, 9, 0));
    assert_eq!(status.badge(), None);
    assert!(!status.overdue);
}
