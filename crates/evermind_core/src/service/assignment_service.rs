//! Assignment use-case service.
//!
//! # Responsibility
//! - Provide the mutation entry points hosts call (add, toggle, delete,
//!   edit) and run the follow-up chain for each: snapshot push, view
//!   refresh, reminder recompute.
//! - Hold host-facing view state: active filter, visible week, cached
//!   projections and transient notices.
//!
//! # Invariants
//! - A mutation is applied in memory before its snapshot is pushed; a
//!   failed push only adds a notice.
//! - Views stay `NotLoaded` until `start_session` runs.
//! - Unknown ids are no-ops and trigger no follow-up work.

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::model::assignment::{
    Assignment, AssignmentDraft, AssignmentId, AssignmentValidationError,
};
use crate::reminder::notifier::Notifier;
use crate::reminder::scheduler::{ReminderIntent, ReminderScheduler, RescheduleSummary};
use crate::store::assignment_store::{AssignmentStore, EditResult};
use crate::sync::bridge::{LoadOutcome, PushOutcome, SyncBridge};
use crate::view::projector::{AssignmentFilter, ViewEntry, ViewProjector};
use crate::view::week::{week_view, WeekView, WeekWindow};
use crate::view::ViewState;
use log::{debug, info};
use serde::Serialize;

pub const ADDED_MESSAGE: &str = "assignment added successfully!";

/// Severity of a transient host message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient message for the host to show and discard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Latest projections, recomputed after every state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub today: ViewState<Vec<ViewEntry>>,
    pub all: ViewState<Vec<ViewEntry>>,
    pub week: ViewState<WeekView>,
}

impl ViewSnapshot {
    fn not_loaded() -> Self {
        Self {
            today: ViewState::NotLoaded,
            all: ViewState::NotLoaded,
            week: ViewState::NotLoaded,
        }
    }
}

/// Orchestration facade over the assignment engine.
pub struct AssignmentService<C: Clock> {
    store: AssignmentStore,
    bridge: SyncBridge,
    scheduler: ReminderScheduler,
    notifier: Box<dyn Notifier>,
    clock: C,
    projector: ViewProjector,
    loaded: bool,
    filter: AssignmentFilter,
    week: WeekWindow,
    views: ViewSnapshot,
    notices: Vec<Notice>,
}

impl<C: Clock> AssignmentService<C> {
    /// Creates a service with an empty store; call `start_session` next.
    pub fn new(
        bridge: SyncBridge,
        notifier: Box<dyn Notifier>,
        clock: C,
        config: &EngineConfig,
    ) -> Self {
        let week = WeekWindow::containing(clock.now_local().date());
        Self {
            store: AssignmentStore::new(),
            bridge,
            scheduler: ReminderScheduler::new(config.reminder_lead(), config.reminder_horizon()),
            notifier,
            clock,
            projector: ViewProjector::new(config.due_soon_window()),
            loaded: false,
            filter: AssignmentFilter::default(),
            week,
            views: ViewSnapshot::not_loaded(),
            notices: Vec::new(),
        }
    }

    /// Loads the session data, then renders views and plans reminders.
    pub fn start_session(&mut self) -> LoadOutcome {
        let outcome = self.bridge.load_session(&mut self.store);
        self.loaded = true;
        self.refresh_views();
        self.reschedule_reminders();
        info!(
            "event=session_start module=service status=ok records={}",
            self.store.len()
        );
        outcome
    }

    /// Re-reads the session data so changes written by another host show
    /// up, then renders views and replans reminders.
    ///
    /// Reminders that already fired stay delivered across reloads.
    pub fn reload(&mut self) -> LoadOutcome {
        let outcome = self.bridge.load_session(&mut self.store);
        self.loaded = true;
        self.refresh_views();
        let summary = self.reschedule_reminders();
        debug!(
            "event=session_reload module=service status=ok records={} scheduled={}",
            self.store.len(),
            summary.scheduled
        );
        outcome
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Validates and appends a new assignment.
    ///
    /// # Errors
    /// - Returns `AssignmentValidationError` when the draft is rejected; an
    ///   error notice carrying the user message is queued and nothing else
    ///   changes.
    pub fn add(
        &mut self,
        draft: &AssignmentDraft,
    ) -> Result<AssignmentId, AssignmentValidationError> {
        let created_at = self.clock.now_utc();
        let id = match self.store.add(draft, created_at) {
            Ok(record) => record.id.clone(),
            Err(err) => {
                self.notices.push(Notice::error(err.user_message()));
                return Err(err);
            }
        };
        self.notices.push(Notice::success(ADDED_MESSAGE));
        self.after_mutation();
        Ok(id)
    }

    /// Flips completion; `None` for unknown ids.
    pub fn toggle_complete(&mut self, id: &AssignmentId) -> Option<bool> {
        let completed = self.store.toggle_complete(id)?;
        self.after_mutation();
        Some(completed)
    }

    /// Hard-deletes a record; `None` for unknown ids.
    pub fn delete(&mut self, id: &AssignmentId) -> Option<Assignment> {
        let removed = self.store.delete(id)?;
        self.after_mutation();
        Some(removed)
    }

    /// Replaces `id` with a new record built from `draft`.
    ///
    /// The new record gets a fresh id, a new creation time and
    /// `completed = false`.
    ///
    /// # Errors
    /// - Returns `AssignmentValidationError` when the draft is rejected; the
    ///   old record stays and an error notice is queued.
    pub fn edit(
        &mut self,
        id: &AssignmentId,
        draft: &AssignmentDraft,
    ) -> Result<EditResult, AssignmentValidationError> {
        let created_at = self.clock.now_utc();
        let result = match self.store.edit(id, draft, created_at) {
            Ok(result) => result,
            Err(err) => {
                self.notices.push(Notice::error(err.user_message()));
                return Err(err);
            }
        };
        self.notices.push(Notice::success(ADDED_MESSAGE));
        self.after_mutation();
        Ok(result)
    }

    /// Draft pre-filled from an existing record, for edit forms.
    pub fn edit_draft(&self, id: &AssignmentId) -> Option<AssignmentDraft> {
        self.store.get(id).map(AssignmentDraft::from_assignment)
    }

    pub fn set_filter(&mut self, filter: AssignmentFilter) {
        if self.filter == filter {
            return;
        }
        self.filter = filter;
        self.refresh_views();
    }

    pub fn filter(&self) -> AssignmentFilter {
        self.filter
    }

    /// Moves the visible week by `weeks` and returns the new window.
    ///
    /// `None` leaves the visible week unchanged when the shift would leave
    /// the representable calendar.
    pub fn navigate_week(&mut self, weeks: i32) -> Option<WeekWindow> {
        let Some(week) = self.week.shift(weeks) else {
            debug!("event=week_navigate module=service status=out_of_range weeks={weeks}");
            return None;
        };
        self.week = week;
        self.refresh_views();
        Some(self.week)
    }

    /// Returns to the week containing today.
    pub fn reset_week(&mut self) -> WeekWindow {
        self.week = WeekWindow::containing(self.clock.now_local().date());
        self.refresh_views();
        self.week
    }

    /// Visible week; reported even when the week view is `Empty`.
    pub fn week_window(&self) -> WeekWindow {
        self.week
    }

    pub fn views(&self) -> &ViewSnapshot {
        &self.views
    }

    /// Recomputes every projection against the current clock reading.
    pub fn refresh_views(&mut self) {
        if !self.loaded {
            return;
        }
        let now = self.clock.now_local();
        let assignments = self.store.assignments();
        self.views = ViewSnapshot {
            today: self.projector.today(assignments, now),
            all: self.projector.all(assignments, now, self.filter),
            week: week_view(assignments, self.week, now.date()),
        };
        debug!(
            "event=views_refresh module=service status=ok filter={} week_start={}",
            self.filter,
            self.week.start()
        );
    }

    /// Recomputes reminder timers from the current collection and gate.
    pub fn reschedule_reminders(&mut self) -> RescheduleSummary {
        let now = self.clock.now_local();
        self.scheduler
            .reschedule(self.store.assignments(), now, self.notifier.as_ref())
    }

    /// Host poll: fires due reminders, then refreshes views and timers.
    ///
    /// Returns the ids whose reminder fired in this tick.
    pub fn tick(&mut self) -> Vec<AssignmentId> {
        let now = self.clock.now_local();
        let fired = self.scheduler.fire_due(now, self.notifier.as_ref());
        self.refresh_views();
        self.reschedule_reminders();
        fired
    }

    pub fn planned_reminders(&self) -> impl Iterator<Item = &ReminderIntent> {
        self.scheduler.pending()
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drains queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn store(&self) -> &AssignmentStore {
        &self.store
    }

    fn after_mutation(&mut self) {
        if let PushOutcome::Failed(err) = self.bridge.push_snapshot(self.store.assignments()) {
            self.notices
                .push(Notice::error(format!("Failed to sync events: {err}")));
        }
        self.refresh_views();
        self.reschedule_reminders();
    }
}
