//! Core scheduling and view-state engine for evermind.
//! This crate is the single source of truth for assignment invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod schedule;
pub mod service;
pub mod store;
pub mod sync;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, EngineConfig, MAX_WINDOW_MINUTES};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::assignment::{
    Assignment, AssignmentDraft, AssignmentId, AssignmentValidationError, Priority, RequiredField,
};
pub use model::document::{AssignmentDocument, DocumentError};
pub use reminder::notifier::{DisabledNotifier, Notifier, RecordingNotifier};
pub use reminder::scheduler::{ReminderIntent, ReminderScheduler, RescheduleSummary};
pub use schedule::classifier::{
    classify, is_due_soon, is_due_today, is_overdue, DueBadge, DueStatus,
};
pub use service::assignment_service::{AssignmentService, Notice, NoticeLevel, ViewSnapshot};
pub use store::assignment_store::{AssignmentStore, EditResult};
pub use sync::bridge::{LoadOutcome, PushOutcome, SyncBridge};
pub use sync::collaborators::{
    IdentityProvider, LocalCache, RemoteStore, SyncError, SyncResult, UserId,
};
pub use sync::memory::{InMemoryCache, InMemoryRemoteStore, StaticIdentity};
pub use sync::sqlite::{SqliteDocumentStore, SqliteLocalCache};
pub use view::projector::{AssignmentFilter, ViewEntry, ViewProjector};
pub use view::week::{week_view, WeekSlot, WeekView, WeekWindow};
pub use view::ViewState;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
