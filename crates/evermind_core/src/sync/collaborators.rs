//! Contracts for identity, remote store and local cache collaborators.
//!
//! The core only needs an opaque per-user document store and a local
//! mirror; transports, sessions and OAuth live outside this crate.

use crate::db::DbError;
use crate::model::assignment::Assignment;
use crate::model::document::{AssignmentDocument, DocumentError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SyncResult<T> = Result<T, SyncError>;

/// Stable identifier of the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(String);

impl UserId {
    /// Returns `None` for blank input.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failures talking to a remote store or local cache.
#[derive(Debug)]
pub enum SyncError {
    Db(DbError),
    Document(DocumentError),
    /// Transport or store-side failure reported by the collaborator.
    Remote(String),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Document(err) => write!(f, "{err}"),
            Self::Remote(message) => write!(f, "{message}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Document(err) => Some(err),
            Self::Remote(_) => None,
        }
    }
}

impl From<DbError> for SyncError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SyncError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<DocumentError> for SyncError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

/// Reports whether a user is signed in.
///
/// Any failure to determine identity must be reported as `None`.
pub trait IdentityProvider {
    fn current_user(&self) -> Option<UserId>;
}

/// Per-user document store of record.
pub trait RemoteStore {
    /// `Ok(None)` when the user has no stored document.
    fn load(&self, user: &UserId) -> SyncResult<Option<AssignmentDocument>>;
    /// Replaces the user's whole document.
    fn save(&self, user: &UserId, document: &AssignmentDocument) -> SyncResult<()>;
}

/// Offline mirror of the assignment list.
pub trait LocalCache {
    /// `Ok(None)` when nothing has been cached yet.
    fn read(&self) -> SyncResult<Option<Vec<Assignment>>>;
    fn write(&self, assignments: &[Assignment]) -> SyncResult<()>;
}
