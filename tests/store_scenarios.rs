//! Scenario and property tests for the task store, driven through the
//! public library API.

use chrono::{DateTime, TimeZone, Utc};
use grouptask::TaskStore;
use grouptask::io::persist::{KEY_GROUPS, KEY_TASKS};
use grouptask::io::storage::{DirStore, MemoryStore};
use grouptask::model::{StoreConfig, Task, TaskId};
use grouptask::ops::drag::{DragController, DropTarget};
use grouptask::ops::task_ops::TaskError;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap()
}

fn store_with_groups(groups: &[&str]) -> TaskStore<MemoryStore> {
    let config = StoreConfig {
        default_groups: groups.iter().map(|g| g.to_string()).collect(),
        ..Default::default()
    };
    TaskStore::open(MemoryStore::new(), config).with_clock(clock)
}

fn texts(store: &TaskStore<MemoryStore>) -> Vec<&str> {
    store
        .snapshot()
        .tasks
        .iter()
        .map(|t| t.text.as_str())
        .collect()
}

fn groups(store: &TaskStore<MemoryStore>) -> Vec<&str> {
    store.snapshot().groups.iter().collect()
}

/// Drag `active` over `target` the way the UI would.
fn drag(store: &mut TaskStore<MemoryStore>, active: TaskId, target: DropTarget) -> bool {
    let mut ctl = DragController::new();
    ctl.start(active);
    match ctl.end(store.snapshot(), Some(&target)) {
        Some(action) => store.apply_drop(action),
        None => false,
    }
}

// ============================================================================
// Validation properties
// ============================================================================

#[test]
fn whitespace_text_never_changes_task_count() {
    let mut store = store_with_groups(&["Work"]);
    for text in ["", " ", "\t\n", "   \u{3000}"] {
        assert_eq!(store.add_task(text, None), Err(TaskError::EmptyText));
    }
    assert!(store.snapshot().tasks.is_empty());
}

#[test]
fn over_length_text_is_rejected_not_truncated() {
    let mut store = store_with_groups(&["Work"]);
    let long = "x".repeat(201);
    assert_eq!(
        store.add_task(&long, None),
        Err(TaskError::TextTooLong { max: 200, len: 201 })
    );
    assert!(store.snapshot().tasks.is_empty());

    let id = store.add_task(&"x".repeat(200), None).unwrap();
    assert_eq!(store.snapshot().task(id).unwrap().text.len(), 200);
}

#[test]
fn configured_length_limit_applies() {
    let config = StoreConfig {
        max_text_len: 5,
        ..Default::default()
    };
    let mut store = TaskStore::open(MemoryStore::new(), config);
    assert!(store.add_task("short", None).is_ok());
    assert!(store.add_task("longer", None).is_err());
}

#[test]
fn toggle_twice_restores_completion() {
    let mut store = store_with_groups(&["Work"]);
    let id = store.add_task("Report", None).unwrap();
    store.toggle_task(id);
    store.toggle_task(id);
    assert!(!store.snapshot().task(id).unwrap().completed);
}

// ============================================================================
// Group scenarios
// ============================================================================

#[test]
fn delete_group_cascades_to_tasks() {
    let mut store = store_with_groups(&["Work", "School"]);
    store.add_task("Buy milk", Some("Work")).unwrap();
    store.add_task("Read book", Some("School")).unwrap();

    assert!(store.delete_group("School"));

    assert_eq!(texts(&store), vec!["Buy milk"]);
    assert_eq!(groups(&store), vec!["Work"]);
    assert!(store.snapshot().tasks.iter().all(|t| t.group != "School"));
}

#[test]
fn duplicate_group_leaves_list_unchanged() {
    let mut store = store_with_groups(&["Work"]);
    assert!(store.add_group("Work").is_err());
    assert_eq!(groups(&store), vec!["Work"]);
}

#[test]
fn rename_group_moves_every_task() {
    let mut store = store_with_groups(&["Work", "School"]);
    let a = store.add_task("A", Some("Work")).unwrap();
    let b = store.add_task("B", Some("Work")).unwrap();
    store.add_task("C", Some("School")).unwrap();

    assert_eq!(store.rename_group("Work", "Job"), Ok(true));

    assert_eq!(groups(&store), vec!["Job", "School"]);
    assert_eq!(store.snapshot().group_ids("Job"), vec![b, a]);
    assert!(store.snapshot().tasks.iter().all(|t| t.group != "Work"));
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn new_tasks_are_prepended() {
    let mut store = store_with_groups(&["Work"]);
    store.add_task("first", None).unwrap();
    store.add_task("second", None).unwrap();
    assert_eq!(texts(&store), vec!["second", "first"]);
}

#[test]
fn reorder_round_trip_law() {
    let mut store = store_with_groups(&["Work", "School"]);
    let a = store.add_task("A", Some("Work")).unwrap();
    store.add_task("X", Some("School")).unwrap();
    let b = store.add_task("B", Some("Work")).unwrap();
    let c = store.add_task("C", Some("Work")).unwrap();

    for perm in [vec![a, b, c], vec![c, a, b], vec![b, c, a], vec![a, c, b]] {
        store.reorder_within_group("Work", &perm);
        assert_eq!(store.snapshot().group_ids("Work"), perm);
    }
}

#[test]
fn drag_within_group_uses_array_move() {
    let mut store = store_with_groups(&["Work"]);
    // prepend order: after three adds the group reads [a, m, b]
    let b = store.add_task("B", None).unwrap();
    let m = store.add_task("M", None).unwrap();
    let a = store.add_task("A", None).unwrap();
    assert_eq!(store.snapshot().group_ids("Work"), vec![a, m, b]);

    assert!(drag(&mut store, a, DropTarget::Task(b)));
    assert_eq!(store.snapshot().group_ids("Work"), vec![m, b, a]);
}

#[test]
fn drag_onto_self_or_nowhere_changes_nothing() {
    let mut store = store_with_groups(&["Work"]);
    let a = store.add_task("A", None).unwrap();
    let before = store.snapshot().clone();

    assert!(!drag(&mut store, a, DropTarget::Task(a)));
    let mut ctl = DragController::new();
    ctl.start(a);
    assert_eq!(ctl.end(store.snapshot(), None), None);
    assert_eq!(store.snapshot(), &before);
}

#[test]
fn drag_across_groups_inserts_at_drop_position() {
    let mut store = store_with_groups(&["Work", "School"]);
    let y = store.add_task("Y", Some("School")).unwrap();
    let x = store.add_task("X", Some("School")).unwrap();
    let a = store.add_task("A", Some("Work")).unwrap();
    assert_eq!(store.snapshot().group_ids("School"), vec![x, y]);

    assert!(drag(&mut store, a, DropTarget::Task(y)));

    assert_eq!(store.snapshot().group_ids("School"), vec![x, a, y]);
    assert!(store.snapshot().group_ids("Work").is_empty());
}

#[test]
fn drag_to_empty_group_zone() {
    let mut store = store_with_groups(&["Work", "Errands"]);
    let a = store.add_task("A", Some("Work")).unwrap();
    store.toggle_task(a);

    assert!(drag(&mut store, a, DropTarget::GroupZone("Errands".into())));
    let task = store.snapshot().task(a).unwrap();
    assert_eq!(task.group, "Errands");
    assert!(task.completed);

    assert!(!drag(&mut store, a, DropTarget::GroupZone("Errands".into())));
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn save_then_reload_gives_identical_snapshot() {
    let tmp = TempDir::new().unwrap();
    let mut store = TaskStore::open(DirStore::open(tmp.path()).unwrap(), StoreConfig::default());
    let a = store.add_task("Buy milk", Some("Errands")).unwrap();
    store.add_task("Essay", Some("School")).unwrap();
    store.toggle_task(a);
    store.add_group("Gym").unwrap();
    store.set_list_title("Weekend").unwrap();
    store.toggle_dark_mode();
    let saved = store.snapshot().clone();
    drop(store);

    let reloaded = TaskStore::open(DirStore::open(tmp.path()).unwrap(), StoreConfig::default());
    assert_eq!(reloaded.snapshot(), &saved);
}

#[test]
fn millisecond_timestamps_load() {
    let storage = MemoryStore::new()
        .with(
            KEY_TASKS,
            r#"[{"id":1714550400000,"text":"Old","group":"Work","completed":true,"createdAt":"2024-05-01T08:00:00.000Z"}]"#,
        )
        .with(KEY_GROUPS, r#"["Work"]"#);
    let store = TaskStore::open(storage, StoreConfig::default());
    let task: &Task = &store.snapshot().tasks[0];
    assert_eq!(task.text, "Old");
    assert!(task.completed);
    assert_eq!(
        task.created_at,
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    );
}

#[test]
fn malformed_groups_recover_without_losing_tasks() {
    let storage = MemoryStore::new()
        .with(
            KEY_TASKS,
            r#"[{"id":1,"text":"Run","group":"Gym","completed":false,"createdAt":"2025-01-01T00:00:00Z"}]"#,
        )
        .with(KEY_GROUPS, "not json");
    let store = TaskStore::open(storage, StoreConfig::default());
    assert_eq!(
        store.snapshot().groups.iter().collect::<Vec<_>>(),
        vec!["Work", "School", "Errands", "Gym"]
    );
    assert_eq!(store.snapshot().tasks.len(), 1);
    assert_eq!(store.storage().raw("groups.corrupt"), Some("not json"));
}

#[test]
fn stored_duplicate_ids_are_toggled_independently() {
    let task = r#"{"id":1,"text":"Same","group":"Work","completed":false,"createdAt":"2025-01-01T00:00:00Z"}"#;
    let storage = MemoryStore::new().with(KEY_TASKS, &format!("[{},{}]", task, task));
    let mut store = TaskStore::open(storage, StoreConfig::default());

    assert!(store.toggle_task(1));
    let state: Vec<(TaskId, bool)> = store
        .snapshot()
        .tasks
        .iter()
        .map(|t| (t.id, t.completed))
        .collect();
    assert_eq!(state, vec![(1, true), (2, false)]);

    assert!(store.delete_task(1));
    assert_eq!(store.snapshot().tasks.len(), 1);
}

#[test]
fn adding_after_max_id_does_not_panic() {
    let storage = MemoryStore::new().with(
        KEY_TASKS,
        r#"[{"id":9223372036854775807,"text":"Last","group":"Work","completed":false,"createdAt":"2025-01-01T00:00:00Z"}]"#,
    );
    let mut store = TaskStore::open(storage, StoreConfig::default()).with_clock(clock);
    let id = store.add_task("new", None).unwrap();
    assert_eq!(id, 1);
    assert_eq!(store.snapshot().tasks.len(), 2);
}
