//! Reminder scheduler.
//!
//! # Responsibility
//! - Plan one reminder per pending assignment, `lead` before its due
//!   instant, when that moment lies within `(now, now + horizon]`.
//! - Keep planned reminders in a registry keyed by assignment id.
//! - Fire due reminders exactly once through the notifier.
//!
//! # Invariants
//! - The registry holds at most one intent per id.
//! - `reschedule` replans the registry; stale ids are cancelled, while an
//!   intent already due for a still-pending id stays until `fire_due`.
//! - Completed assignments never hold an intent after a reschedule.
//! - An id fires at most once, across reschedules and reloads.

use crate::model::assignment::{Assignment, AssignmentId};
use crate::reminder::notifier::Notifier;
use chrono::{Duration, NaiveDateTime};
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

/// Title used for every reminder notification.
pub const REMINDER_TITLE: &str = "Assignment Reminder - evermind";

/// A planned one-shot notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderIntent {
    pub assignment_id: AssignmentId,
    /// Wall-clock moment the reminder should fire.
    pub fire_at: NaiveDateTime,
    /// Offset from the planning instant to `fire_at`; always positive.
    pub delay: Duration,
    pub title: String,
    pub body: String,
}

/// Counts from one `reschedule` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RescheduleSummary {
    pub scheduled: usize,
    pub cancelled: usize,
    /// `true` when the notifier gate was closed and nothing was planned.
    pub gated: bool,
}

/// Plans the reminder for one assignment, if any is due in this pass.
pub fn plan_reminder(
    assignment: &Assignment,
    now: NaiveDateTime,
    lead: Duration,
    horizon: Duration,
) -> Option<ReminderIntent> {
    if assignment.completed {
        return None;
    }
    let fire_at = assignment.due_instant().checked_sub_signed(lead)?;
    let delay = fire_at - now;
    if delay <= Duration::zero() || delay > horizon {
        return None;
    }
    Some(ReminderIntent {
        assignment_id: assignment.id.clone(),
        fire_at,
        delay,
        title: REMINDER_TITLE.to_string(),
        body: format!(
            "{} for {} is due tomorrow!",
            assignment.title, assignment.course
        ),
    })
}

/// Plans reminders for every pending assignment, in collection order.
pub fn plan_reminders(
    assignments: &[Assignment],
    now: NaiveDateTime,
    lead: Duration,
    horizon: Duration,
) -> Vec<ReminderIntent> {
    assignments
        .iter()
        .filter_map(|assignment| plan_reminder(assignment, now, lead, horizon))
        .collect()
}

/// Keyed registry of pending one-shot reminders.
#[derive(Debug, Clone)]
pub struct ReminderScheduler {
    lead: Duration,
    horizon: Duration,
    timers: BTreeMap<AssignmentId, ReminderIntent>,
    delivered: BTreeSet<AssignmentId>,
}

impl Default for ReminderScheduler {
    fn default() -> Self {
        Self::new(Duration::hours(24), Duration::hours(24))
    }
}

impl ReminderScheduler {
    pub fn new(lead: Duration, horizon: Duration) -> Self {
        Self {
            lead,
            horizon,
            timers: BTreeMap::new(),
            delivered: BTreeSet::new(),
        }
    }

    /// Recomputes every timer from the current collection.
    ///
    /// Safe to call after every mutation: each id keeps at most one timer,
    /// and ids no longer eligible are cancelled. A timer whose `fire_at`
    /// has passed is kept while its assignment is still pending, so a
    /// mutation landing between the fire moment and the next `fire_due`
    /// does not drop it. Ids that already fired are never planned again.
    /// When the notifier gate is closed all timers are cancelled and
    /// nothing is planned.
    pub fn reschedule(
        &mut self,
        assignments: &[Assignment],
        now: NaiveDateTime,
        notifier: &dyn Notifier,
    ) -> RescheduleSummary {
        let pending: BTreeSet<&AssignmentId> = assignments
            .iter()
            .filter(|assignment| !assignment.completed)
            .map(|assignment| &assignment.id)
            .collect();
        self.delivered.retain(|id| pending.contains(id));

        if !notifier.can_notify() {
            let cancelled = self.cancel_all();
            debug!("event=reminder_reschedule module=reminder status=gated cancelled={cancelled}");
            return RescheduleSummary {
                scheduled: 0,
                cancelled,
                gated: true,
            };
        }

        let mut planned: BTreeMap<AssignmentId, ReminderIntent> =
            plan_reminders(assignments, now, self.lead, self.horizon)
                .into_iter()
                .filter(|intent| !self.delivered.contains(&intent.assignment_id))
                .map(|intent| (intent.assignment_id.clone(), intent))
                .collect();
        for (id, intent) in &self.timers {
            if intent.fire_at <= now && pending.contains(id) && !planned.contains_key(id) {
                planned.insert(id.clone(), intent.clone());
            }
        }
        let cancelled = self
            .timers
            .keys()
            .filter(|id| !planned.contains_key(*id))
            .count();
        self.timers = planned;

        info!(
            "event=reminder_reschedule module=reminder status=ok scheduled={} cancelled={cancelled}",
            self.timers.len()
        );
        RescheduleSummary {
            scheduled: self.timers.len(),
            cancelled,
            gated: false,
        }
    }

    /// Fires every timer with `fire_at <= now` and removes it.
    ///
    /// Returns the ids that fired, in `fire_at` order. A closed gate cancels
    /// all timers instead of firing them.
    pub fn fire_due(&mut self, now: NaiveDateTime, notifier: &dyn Notifier) -> Vec<AssignmentId> {
        if !notifier.can_notify() {
            self.cancel_all();
            return Vec::new();
        }

        let mut due: Vec<ReminderIntent> = Vec::new();
        self.timers.retain(|_, intent| {
            if intent.fire_at <= now {
                due.push(intent.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.fire_at.cmp(&b.fire_at));

        for intent in &due {
            notifier.fire(&intent.title, &intent.body);
            self.delivered.insert(intent.assignment_id.clone());
            info!(
                "event=reminder_fire module=reminder status=ok id={}",
                intent.assignment_id
            );
        }
        due.into_iter().map(|intent| intent.assignment_id).collect()
    }

    /// Cancels the timer for `id`; `true` if one existed.
    pub fn cancel(&mut self, id: &AssignmentId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Cancels every timer and returns how many were pending.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.timers.len();
        self.timers.clear();
        count
    }

    pub fn get(&self, id: &AssignmentId) -> Option<&ReminderIntent> {
        self.timers.get(id)
    }

    /// Pending intents ordered by assignment id.
    pub fn pending(&self) -> impl Iterator<Item = &ReminderIntent> {
        self.timers.values()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest pending `fire_at`, for hosts that sleep until the next timer.
    pub fn next_fire_at(&self) -> Option<NaiveDateTime> {
        self.timers.values().map(|intent| intent.fire_at).min()
    }
}

#[cfg(test)]
mod tests {
    use super::{plan_reminder, ReminderScheduler};
    use crate::model::assignment::{Assignment, AssignmentDraft};
    use crate::reminder::notifier::RecordingNotifier;
    use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn due_in(hours: i64) -> Assignment {
        let due = now() + Duration::hours(hours);
        let draft = AssignmentDraft::new("Lab", "PHY201", due.format("%Y-%m-%d").to_string())
            .with_due_time(due.format("%H:%M").to_string());
        Assignment::from_draft(&draft, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
            .unwrap()
    }

    #[test]
    fn reminder_exactly_at_now_is_not_planned() {
        let day = Duration::hours(24);
        assert!(plan_reminder(&due_in(24), now(), day, day).is_none());
        assert!(plan_reminder(&due_in(48), now(), day, day).is_some());
        assert!(plan_reminder(&due_in(49), now(), day, day).is_none());
    }

    #[test]
    fn body_names_title_and_course() {
        let day = Duration::hours(24);
        let intent = plan_reminder(&due_in(30), now(), day, day).unwrap();
        assert_eq!(intent.body, "Lab for PHY201 is due tomorrow!");
        assert_eq!(intent.title, "Assignment Reminder - evermind");
    }

    #[test]
    fn fire_due_is_one_shot() {
        let notifier = RecordingNotifier::allowing();
        let mut scheduler = ReminderScheduler::default();
        let items = vec![due_in(30)];
        scheduler.reschedule(&items, now(), &notifier);

        assert!(scheduler.fire_due(now() + Duration::hours(5), &notifier).is_empty());
        assert_eq!(scheduler.fire_due(now() + Duration::hours(6), &notifier).len(), 1);
        assert!(scheduler.fire_due(now() + Duration::hours(7), &notifier).is_empty());
        assert_eq!(notifier.fired().len(), 1);
    }

    #[test]
    fn lead_beyond_representable_time_plans_nothing() {
        let huge = Duration::days(365 * 1_000_000);
        assert!(plan_reminder(&due_in(30), now(), huge, Duration::hours(24)).is_none());
    }

    #[test]
    fn overdue_intent_survives_reschedule_until_fired() {
        let notifier = RecordingNotifier::allowing();
        let mut scheduler = ReminderScheduler::default();
        let items = vec![due_in(30)];
        scheduler.reschedule(&items, now(), &notifier);

        let late = now() + Duration::hours(6) + Duration::minutes(1);
        let summary = scheduler.reschedule(&items, late, &notifier);
        assert_eq!(summary.scheduled, 1);
        assert_eq!(summary.cancelled, 0);
        assert_eq!(scheduler.fire_due(late, &notifier), vec![items[0].id.clone()]);
    }

    #[test]
    fn fired_id_is_not_planned_again() {
        let notifier = RecordingNotifier::allowing();
        let mut scheduler = ReminderScheduler::default();
        let items = vec![due_in(30)];
        scheduler.reschedule(&items, now(), &notifier);
        scheduler.fire_due(now() + Duration::hours(6), &notifier);

        // An earlier clock reading would otherwise plan the same reminder.
        scheduler.reschedule(&items, now(), &notifier);
        assert!(scheduler.is_empty());
    }
}
