//! Session load and snapshot push between the store and its mirrors.
//!
//! # Responsibility
//! - Populate the store at session start from the remote document, falling
//!   back to the local cache.
//! - Mirror every mutation as a full snapshot to the cache and the remote.
//!
//! # Invariants
//! - Load failures are silent: the store keeps cached or existing state.
//! - Push failures never roll back the in-memory mutation.
//! - Unauthenticated sessions never touch the remote store.

use crate::model::assignment::Assignment;
use crate::model::document::AssignmentDocument;
use crate::store::assignment_store::AssignmentStore;
use crate::sync::collaborators::{IdentityProvider, LocalCache, RemoteStore, SyncError, UserId};
use log::{info, warn};

/// Where the session's initial data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Remote document replaced the store.
    Remote { records: usize },
    /// Remote unavailable or not applicable; local cache was used.
    Cache { records: usize },
    /// Neither source had data; the store was left as it was.
    Nothing,
}

/// Result of mirroring one snapshot.
#[derive(Debug)]
pub enum PushOutcome {
    /// Cache written; no remote configured or user not signed in.
    LocalOnly,
    /// Cache written and remote document replaced.
    Synced,
    /// Remote save failed; the local state stands.
    Failed(SyncError),
}

impl PushOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Identity that never reports a signed-in user.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_user(&self) -> Option<UserId> {
        None
    }
}

/// Connects the in-memory store to its cache and remote collaborators.
pub struct SyncBridge {
    identity: Box<dyn IdentityProvider>,
    remote: Option<Box<dyn RemoteStore>>,
    cache: Box<dyn LocalCache>,
}

impl SyncBridge {
    pub fn new(
        identity: Box<dyn IdentityProvider>,
        remote: Box<dyn RemoteStore>,
        cache: Box<dyn LocalCache>,
    ) -> Self {
        Self {
            identity,
            remote: Some(remote),
            cache,
        }
    }

    /// Offline bridge: local cache only, no remote store.
    pub fn local_only(cache: Box<dyn LocalCache>) -> Self {
        Self {
            identity: Box::new(Anonymous),
            remote: None,
            cache,
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Signed-in user when a remote store is configured.
    pub fn session_user(&self) -> Option<UserId> {
        self.remote.as_ref()?;
        self.identity.current_user()
    }

    /// Populates `store` at session start.
    ///
    /// The remote document wins when it can be fetched and decoded; it is
    /// then written through to the cache. Otherwise the cache contents are
    /// used. Errors are logged and swallowed.
    pub fn load_session(&self, store: &mut AssignmentStore) -> LoadOutcome {
        if let Some(records) = self.load_remote() {
            let count = records.len();
            if let Err(err) = self.cache.write(&records) {
                warn!("event=sync_load module=sync status=cache_write_failed error={err}");
            }
            store.replace_all(records);
            info!("event=sync_load module=sync status=ok source=remote records={count}");
            return LoadOutcome::Remote { records: count };
        }

        match self.cache.read() {
            Ok(Some(records)) => {
                let count = records.len();
                store.replace_all(records);
                info!("event=sync_load module=sync status=ok source=cache records={count}");
                LoadOutcome::Cache { records: count }
            }
            Ok(None) => {
                info!("event=sync_load module=sync status=ok source=none");
                LoadOutcome::Nothing
            }
            Err(err) => {
                warn!("event=sync_load module=sync status=error source=cache error={err}");
                LoadOutcome::Nothing
            }
        }
    }

    /// Mirrors the full collection to the cache and, when signed in, to the
    /// remote store.
    pub fn push_snapshot(&self, assignments: &[Assignment]) -> PushOutcome {
        if let Err(err) = self.cache.write(assignments) {
            warn!("event=sync_push module=sync status=cache_write_failed error={err}");
        }

        let (Some(remote), Some(user)) = (self.remote.as_ref(), self.session_user()) else {
            return PushOutcome::LocalOnly;
        };

        let document = AssignmentDocument::from_assignments(assignments);
        match remote.save(&user, &document) {
            Ok(()) => {
                info!(
                    "event=sync_push module=sync status=ok records={}",
                    assignments.len()
                );
                PushOutcome::Synced
            }
            Err(err) => {
                warn!("event=sync_push module=sync status=error error={err}");
                PushOutcome::Failed(err)
            }
        }
    }

    fn load_remote(&self) -> Option<Vec<Assignment>> {
        let remote = self.remote.as_ref()?;
        let Some(user) = self.identity.current_user() else {
            info!("event=sync_load module=sync status=skipped reason=unauthenticated");
            return None;
        };

        match remote.load(&user) {
            Ok(Some(document)) => Some(document.into_assignments()),
            Ok(None) => {
                info!("event=sync_load module=sync status=not_found source=remote");
                None
            }
            Err(err) => {
                warn!("event=sync_load module=sync status=error source=remote error={err}");
                None
            }
        }
    }
}
