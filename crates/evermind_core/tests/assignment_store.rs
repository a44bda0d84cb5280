use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use evermind_core::{
    AssignmentDraft, AssignmentFilter, AssignmentId, AssignmentStore, Priority, ViewProjector,
};

fn created_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

fn essay() -> AssignmentDraft {
    AssignmentDraft::new("Essay", "ENG101", "2025-03-10")
        .with_due_time("23:59")
        .with_priority(Priority::High)
}

#[test]
fn add_then_delete_restores_previous_collection() {
    let mut store = AssignmentStore::new();
    store
        .add(&AssignmentDraft::new("Lab", "PHY201", "2025-03-12"), created_at())
        .unwrap();
    let before = store.assignments().to_vec();

    let id = store.add(&essay(), created_at()).unwrap().id.clone();
    assert_eq!(store.len(), 2);

    let removed = store.delete(&id).unwrap();
    assert_eq!(removed.id, id);
    assert_eq!(store.assignments(), before.as_slice());
}

#[test]
fn rejected_add_leaves_store_unchanged() {
    let mut store = AssignmentStore::new();
    assert!(store
        .add(&AssignmentDraft::new("", "ENG101", "2025-03-10"), created_at())
        .is_err());
    assert!(store.is_empty());
}

#[test]
fn toggle_moves_record_between_filters() {
    let mut store = AssignmentStore::new();
    let id = store.add(&essay(), created_at()).unwrap().id.clone();
    assert_eq!(store.len(), 1);

    assert_eq!(store.toggle_complete(&id), Some(true));
    assert!(store.get(&id).unwrap().completed);

    let now = NaiveDate::from_ymd_opt(2025, 3, 12)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    assert_eq!(
        filtered_ids(&store, now, AssignmentFilter::Completed),
        vec![id.clone()]
    );
    assert!(filtered_ids(&store, now, AssignmentFilter::Pending).is_empty());
    assert!(filtered_ids(&store, now, AssignmentFilter::Overdue).is_empty());

    assert_eq!(store.toggle_complete(&id), Some(false));
    assert_eq!(
        filtered_ids(&store, now, AssignmentFilter::Overdue),
        vec![id]
    );
}

fn filtered_ids(
    store: &AssignmentStore,
    now: NaiveDateTime,
    filter: AssignmentFilter,
) -> Vec<AssignmentId> {
    ViewProjector::default()
        .all(store.assignments(), now, filter)
        .items()
        .iter()
        .map(|entry| entry.assignment.id.clone())
        .collect()
}

#[test]
fn unknown_ids_are_noops() {
    let mut store = AssignmentStore::new();
    store.add(&essay(), created_at()).unwrap();
    let before = store.assignments().to_vec();

    let missing = AssignmentId::from("does-not-exist");
    assert_eq!(store.toggle_complete(&missing), None);
    assert!(store.delete(&missing).is_none());
    assert_eq!(store.assignments(), before.as_slice());
}

#[test]
fn edit_replaces_record_with_fresh_identity() {
    let mut store = AssignmentStore::new();
    let id = store.add(&essay(), created_at()).unwrap().id.clone();
    store.toggle_complete(&id);

    let draft = AssignmentDraft::from_assignment(store.get(&id).unwrap()).with_due_time("18:00");
    let later = Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap();
    let result = store.edit(&id, &draft, later).unwrap();

    assert_eq!(result.old_id, Some(id.clone()));
    assert_ne!(result.new_id, id);
    assert!(!store.contains(&id));

    let edited = store.get(&result.new_id).unwrap();
    assert_eq!(edited.title, "Essay");
    assert_eq!(edited.due_time_text(), "18:00");
    assert!(!edited.completed);
    assert_eq!(edited.created_at, later);
}

#[test]
fn rejected_edit_keeps_old_record() {
    let mut store = AssignmentStore::new();
    let id = store.add(&essay(), created_at()).unwrap().id.clone();

    let draft = AssignmentDraft::new("Essay", "", "2025-03-10");
    assert!(store.edit(&id, &draft, created_at()).is_err());
    assert!(store.contains(&id));
    assert_eq!(store.len(), 1);
}

#[test]
fn edit_of_missing_id_still_adds() {
    let mut store = AssignmentStore::new();
    let result = store
        .edit(&AssignmentId::from("gone"), &essay(), created_at())
        .unwrap();
    assert_eq!(result.old_id, None);
    assert!(store.contains(&result.new_id));
}

#[test]
fn replace_all_keeps_first_of_duplicate_ids() {
    let mut source = AssignmentStore::new();
    let first = source.add(&essay(), created_at()).unwrap().clone();
    let mut duplicate = first.clone();
    duplicate.title = "Copy".to_string();

    let mut store = AssignmentStore::new();
    let dropped = store.replace_all(vec![first.clone(), duplicate]);
    assert_eq!(dropped, 1);
    assert_eq!(store.assignments(), &[first]);
}
