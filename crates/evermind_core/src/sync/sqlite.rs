//! SQLite-backed document store and local cache.
//!
//! # Responsibility
//! - `SqliteDocumentStore`: one JSON document per user in `userdata`,
//!   replaced wholesale on every save.
//! - `SqliteLocalCache`: assignment snapshot and notification preference
//!   in `kv_cache`.
//!
//! # Invariants
//! - Stored documents always use the `{ "events": [...] }` shape.
//! - A cached value that no longer decodes is reported, never masked.

use crate::config::{DEFAULT_ASSIGNMENTS_KEY, DEFAULT_NOTIFICATIONS_KEY};
use crate::db::{open_db, DbResult};
use crate::model::assignment::Assignment;
use crate::model::document::AssignmentDocument;
use crate::sync::collaborators::{LocalCache, RemoteStore, SyncResult, UserId};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Per-user document table acting as the store of record.
pub struct SqliteDocumentStore {
    conn: Connection,
}

impl SqliteDocumentStore {
    /// Wraps a connection that already went through `open_db`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::new(open_db(path)?))
    }
}

impl RemoteStore for SqliteDocumentStore {
    fn load(&self, user: &UserId) -> SyncResult<Option<AssignmentDocument>> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM userdata WHERE user_id = ?1;",
                [user.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match data {
            Some(text) => Ok(Some(AssignmentDocument::from_json(&text)?)),
            None => Ok(None),
        }
    }

    fn save(&self, user: &UserId, document: &AssignmentDocument) -> SyncResult<()> {
        let text = document.to_json()?;
        self.conn.execute(
            "INSERT INTO userdata (user_id, data)
             VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET
                data = excluded.data,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![user.as_str(), text],
        )?;
        Ok(())
    }
}

/// Key/value local mirror.
pub struct SqliteLocalCache {
    conn: Connection,
    assignments_key: String,
    notifications_key: String,
}

impl SqliteLocalCache {
    pub fn new(conn: Connection) -> Self {
        Self::with_keys(conn, DEFAULT_ASSIGNMENTS_KEY, DEFAULT_NOTIFICATIONS_KEY)
    }

    pub fn with_keys(
        conn: Connection,
        assignments_key: impl Into<String>,
        notifications_key: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            assignments_key: assignments_key.into(),
            notifications_key: notifications_key.into(),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Stored notification preference; `false` when never set.
    pub fn notifications_enabled(&self) -> SyncResult<bool> {
        Ok(self.get(&self.notifications_key)?.as_deref() == Some("true"))
    }

    pub fn set_notifications_enabled(&self, enabled: bool) -> SyncResult<()> {
        self.put(&self.notifications_key, if enabled { "true" } else { "false" })
    }

    fn get(&self, key: &str) -> SyncResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_cache WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> SyncResult<()> {
        self.conn.execute(
            "INSERT INTO kv_cache (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

impl LocalCache for SqliteLocalCache {
    fn read(&self) -> SyncResult<Option<Vec<Assignment>>> {
        match self.get(&self.assignments_key)? {
            Some(text) => Ok(Some(
                AssignmentDocument::from_json(&text)?.into_assignments(),
            )),
            None => Ok(None),
        }
    }

    fn write(&self, assignments: &[Assignment]) -> SyncResult<()> {
        let text = AssignmentDocument::from_assignments(assignments).to_json()?;
        self.put(&self.assignments_key, &text)
    }
}
