//! Assignment store operations.
//!
//! # Responsibility
//! - Provide add/toggle/delete/edit over the ordered collection.
//! - Accept wholesale replacement from the sync loader.
//!
//! # Invariants
//! - No two records share an `id`.
//! - `edit` is delete + add: the new record gets a fresh `id` and
//!   `created_at`. A rejected edit leaves the collection untouched.
//! - The store never persists anything itself; callers push snapshots.

use crate::model::assignment::{
    Assignment, AssignmentDraft, AssignmentId, AssignmentValidationError,
};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashSet;

/// Outcome of an edit: the removed id (if it still existed) and the new id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    pub old_id: Option<AssignmentId>,
    pub new_id: AssignmentId,
}

/// Ordered, exclusively owned assignment list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentStore {
    records: Vec<Assignment>,
}

impl AssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from existing records, dropping duplicate ids.
    pub fn from_records(records: Vec<Assignment>) -> Self {
        let mut store = Self::new();
        store.replace_all(records);
        store
    }

    /// Validates `draft` and appends a new pending record.
    ///
    /// # Errors
    /// - Returns `AssignmentValidationError` when a required field is blank
    ///   or a field fails its format check. Nothing is appended.
    pub fn add(
        &mut self,
        draft: &AssignmentDraft,
        created_at: DateTime<Utc>,
    ) -> Result<&Assignment, AssignmentValidationError> {
        let mut record = match Assignment::from_draft(draft, created_at) {
            Ok(record) => record,
            Err(err) => {
                info!("event=assignment_add module=store status=rejected reason={err}");
                return Err(err);
            }
        };
        while self.contains(&record.id) {
            record.id = AssignmentId::generate();
        }

        info!(
            "event=assignment_add module=store status=ok id={} total={}",
            record.id,
            self.records.len() + 1
        );
        self.records.push(record);
        let index = self.records.len() - 1;
        Ok(&self.records[index])
    }

    /// Flips `completed` and returns the new value.
    ///
    /// Returns `None` without error when `id` is unknown; the record may have
    /// been deleted in the meantime.
    pub fn toggle_complete(&mut self, id: &AssignmentId) -> Option<bool> {
        let Some(record) = self.records.iter_mut().find(|record| &record.id == id) else {
            debug!("event=assignment_toggle module=store status=noop id={id}");
            return None;
        };
        record.completed = !record.completed;
        info!(
            "event=assignment_toggle module=store status=ok id={id} completed={}",
            record.completed
        );
        Some(record.completed)
    }

    /// Removes the record with `id`; `None` when it does not exist.
    pub fn delete(&mut self, id: &AssignmentId) -> Option<Assignment> {
        let Some(index) = self.position(id) else {
            debug!("event=assignment_delete module=store status=noop id={id}");
            return None;
        };
        let removed = self.records.remove(index);
        info!(
            "event=assignment_delete module=store status=ok id={id} total={}",
            self.records.len()
        );
        Some(removed)
    }

    /// Replaces a record by deleting it and adding `draft` as a new one.
    ///
    /// The draft is validated before the delete, so a rejected edit keeps
    /// the old record in place.
    pub fn edit(
        &mut self,
        id: &AssignmentId,
        draft: &AssignmentDraft,
        created_at: DateTime<Utc>,
    ) -> Result<EditResult, AssignmentValidationError> {
        draft.validate()?;

        let old_id = self.delete(id).map(|removed| removed.id);
        let new_id = self.add(draft, created_at)?.id.clone();
        info!(
            "event=assignment_edit module=store status=ok old_id={} new_id={new_id}",
            old_id.as_ref().map_or("none", AssignmentId::as_str)
        );
        Ok(EditResult { old_id, new_id })
    }

    /// Replaces the whole collection, keeping the first of any duplicate ids.
    ///
    /// Returns the number of records dropped as duplicates.
    pub fn replace_all(&mut self, records: Vec<Assignment>) -> usize {
        let incoming = records.len();
        let mut seen = HashSet::with_capacity(incoming);
        self.records = records
            .into_iter()
            .filter(|record| seen.insert(record.id.clone()))
            .collect();

        let dropped = incoming - self.records.len();
        if dropped > 0 {
            warn!(
                "event=assignment_replace module=store status=deduplicated dropped={dropped}"
            );
        }
        info!(
            "event=assignment_replace module=store status=ok total={}",
            self.records.len()
        );
        dropped
    }

    pub fn get(&self, id: &AssignmentId) -> Option<&Assignment> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn contains(&self, id: &AssignmentId) -> bool {
        self.position(id).is_some()
    }

    /// Records in insertion order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.records
    }

    /// Records with `completed == false`, in insertion order.
    pub fn pending(&self) -> impl Iterator<Item = &Assignment> {
        self.records.iter().filter(|record| !record.completed)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: &AssignmentId) -> Option<usize> {
        self.records.iter().position(|record| &record.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::AssignmentStore;
    use crate::model::assignment::{AssignmentDraft, AssignmentId, Priority};
    use chrono::{TimeZone, Utc};

    fn draft(title: &str) -> AssignmentDraft {
        AssignmentDraft::new(title, "CS101", "2025-03-10").with_priority(Priority::Low)
    }

    #[test]
    fn add_assigns_unique_ids() {
        let mut store = AssignmentStore::new();
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let first = store.add(&draft("a"), created).unwrap().id.clone();
        let second = store.add(&draft("b"), created).unwrap().id.clone();
        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn unknown_ids_are_silent_noops() {
        let mut store = AssignmentStore::new();
        let missing = AssignmentId::from("missing");
        assert_eq!(store.toggle_complete(&missing), None);
        assert!(store.delete(&missing).is_none());
    }

    #[test]
    fn rejected_edit_keeps_original_record() {
        let mut store = AssignmentStore::new();
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let id = store.add(&draft("keep me"), created).unwrap().id.clone();

        let err = store
            .edit(&id, &AssignmentDraft::new("", "CS101", "2025-03-10"), created)
            .unwrap_err();
        assert!(err.to_string().contains("title"));
        assert!(store.contains(&id));
    }
}
