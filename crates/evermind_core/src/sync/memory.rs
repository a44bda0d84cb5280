//! In-process collaborators for offline hosts and tests.

use crate::model::assignment::Assignment;
use crate::model::document::AssignmentDocument;
use crate::sync::collaborators::{
    IdentityProvider, LocalCache, RemoteStore, SyncError, SyncResult, UserId,
};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Identity fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<UserId>,
}

impl StaticIdentity {
    pub fn signed_in(user: UserId) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }
}

#[derive(Debug, Default)]
struct RemoteState {
    documents: RefCell<BTreeMap<UserId, AssignmentDocument>>,
    fail_loads: Cell<bool>,
    fail_saves: Cell<bool>,
    saves: Cell<usize>,
}

/// Shared in-memory document store with injectable failures.
///
/// Clones share the same documents, so a test can keep a handle while the
/// bridge owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRemoteStore {
    state: Rc<RemoteState>,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: UserId, document: AssignmentDocument) {
        self.state.documents.borrow_mut().insert(user, document);
    }

    pub fn document(&self, user: &UserId) -> Option<AssignmentDocument> {
        self.state.documents.borrow().get(user).cloned()
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.state.fail_loads.set(fail);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.state.fail_saves.set(fail);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.state.saves.get()
    }
}

impl RemoteStore for InMemoryRemoteStore {
    fn load(&self, user: &UserId) -> SyncResult<Option<AssignmentDocument>> {
        if self.state.fail_loads.get() {
            return Err(SyncError::Remote("Failed to load events".to_string()));
        }
        Ok(self.document(user))
    }

    fn save(&self, user: &UserId, document: &AssignmentDocument) -> SyncResult<()> {
        if self.state.fail_saves.get() {
            return Err(SyncError::Remote("Internal server error".to_string()));
        }
        self.insert(user.clone(), document.clone());
        self.state.saves.set(self.state.saves.get() + 1);
        Ok(())
    }
}

/// Shared in-memory local cache.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    records: Rc<RefCell<Option<Vec<Assignment>>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(records: Vec<Assignment>) -> Self {
        Self {
            records: Rc::new(RefCell::new(Some(records))),
        }
    }

    pub fn snapshot(&self) -> Option<Vec<Assignment>> {
        self.records.borrow().clone()
    }
}

impl LocalCache for InMemoryCache {
    fn read(&self) -> SyncResult<Option<Vec<Assignment>>> {
        Ok(self.snapshot())
    }

    fn write(&self, assignments: &[Assignment]) -> SyncResult<()> {
        *self.records.borrow_mut() = Some(assignments.to_vec());
        Ok(())
    }
}
