//! The task store: sole owner of the list state.
//!
//! Every mutation goes through a method here. A mutation that changes
//! something is persisted and then announced to subscribers; a rejected or
//! no-op call does neither.

use chrono::{DateTime, Utc};
use log::{debug, trace, warn};
use rand::Rng;

use crate::io::persist::{PersistError, PersistenceBridge};
use crate::io::storage::KeyValueStore;
use crate::model::config::StoreConfig;
use crate::model::snapshot::Snapshot;
use crate::model::task::TaskId;
use crate::ops::drag::DropAction;
use crate::ops::group_ops::{self, GroupError};
use crate::ops::list_ops::{self, TitleError};
use crate::ops::task_ops::{self, TaskError};
use crate::ops::suggest;

/// Handle returned by [`TaskStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type Listener = Box<dyn FnMut(&Snapshot)>;

pub struct TaskStore<S: KeyValueStore> {
    snapshot: Snapshot,
    config: StoreConfig,
    bridge: PersistenceBridge<S>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: usize,
    clock: fn() -> DateTime<Utc>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Load state from `storage` and write it back once, so that a first
    /// run leaves the defaults on disk.
    pub fn open(storage: S, config: StoreConfig) -> Self {
        let mut bridge = PersistenceBridge::new(storage);
        let outcome = bridge.load(&config);
        if !outcome.recovered.is_empty() {
            debug!("{} keys fell back to defaults", outcome.recovered.len());
        }
        let mut store = TaskStore {
            snapshot: outcome.snapshot,
            config,
            bridge,
            listeners: Vec::new(),
            next_listener: 0,
            clock: Utc::now,
        };
        store.persist();
        store
    }

    /// Replace the clock used for ids and creation timestamps.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn storage(&self) -> &S {
        self.bridge.store()
    }

    /// False once storage has failed; the session then runs in memory only.
    pub fn is_persistent(&self) -> bool {
        !self.bridge.is_disabled()
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Register a callback run after every successful mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&Snapshot) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    pub fn add_task(&mut self, text: &str, group: Option<&str>) -> Result<TaskId, TaskError> {
        let now = (self.clock)();
        let id = task_ops::add_task(&mut self.snapshot, text, group, &self.config, now)?;
        self.commit("add task");
        Ok(id)
    }

    /// Add a randomly chosen suggestion, like the dice button.
    pub fn add_suggestion<R: Rng + ?Sized>(
        &mut self,
        group: Option<&str>,
        rng: &mut R,
    ) -> Result<TaskId, TaskError> {
        let text = suggest::pick(rng);
        self.add_task(text, group)
    }

    pub fn toggle_task(&mut self, id: TaskId) -> bool {
        self.apply("toggle task", |snap| task_ops::toggle_task(snap, id))
    }

    pub fn delete_task(&mut self, id: TaskId) -> bool {
        self.apply("delete task", |snap| task_ops::delete_task(snap, id))
    }

    pub fn move_task_to_group(&mut self, id: TaskId, group: &str) -> bool {
        self.apply("move task", |snap| {
            task_ops::move_task_to_group(snap, id, group)
        })
    }

    pub fn reorder_within_group(&mut self, group: &str, ids: &[TaskId]) -> bool {
        self.apply("reorder group", |snap| {
            task_ops::reorder_within_group(snap, group, ids)
        })
    }

    /// Apply the outcome of a finished drag gesture as one mutation.
    pub fn apply_drop(&mut self, action: DropAction) -> bool {
        match action {
            DropAction::Reorder { group, ids } => self.reorder_within_group(&group, &ids),
            DropAction::MoveToGroup { id, group } => self.move_task_to_group(id, &group),
            DropAction::MoveToGroupAt { id, group, ids } => {
                let mut next = self.snapshot.clone();
                if !task_ops::move_task_to_group(&mut next, id, &group) {
                    return false;
                }
                task_ops::reorder_within_group(&mut next, &group, &ids);
                self.snapshot = next;
                self.commit("move task across groups");
                true
            }
        }
    }

    // -----------------------------------------------------------------------
    // Groups
    // -----------------------------------------------------------------------

    pub fn add_group(&mut self, name: &str) -> Result<(), GroupError> {
        group_ops::add_group(&mut self.snapshot, name)?;
        self.commit("add group");
        Ok(())
    }

    pub fn rename_group(&mut self, old: &str, new: &str) -> Result<bool, GroupError> {
        let changed = group_ops::rename_group(&mut self.snapshot, old, new)?;
        if changed {
            self.commit("rename group");
        }
        Ok(changed)
    }

    pub fn delete_group(&mut self, name: &str) -> bool {
        self.apply("delete group", |snap| group_ops::delete_group(snap, name))
    }

    // -----------------------------------------------------------------------
    // List settings
    // -----------------------------------------------------------------------

    pub fn set_list_title(&mut self, title: &str) -> Result<bool, TitleError> {
        let changed = list_ops::set_title(&mut self.snapshot, title)?;
        if changed {
            self.commit("set title");
        }
        Ok(changed)
    }

    pub fn set_dark_mode(&mut self, dark: bool) -> bool {
        self.apply("set theme", |snap| list_ops::set_dark_mode(snap, dark))
    }

    /// Flip the theme. Returns the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        let dark = !self.snapshot.dark_mode;
        self.set_dark_mode(dark);
        dark
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn apply(&mut self, what: &str, op: impl FnOnce(&mut Snapshot) -> bool) -> bool {
        let changed = op(&mut self.snapshot);
        if changed {
            self.commit(what);
        } else {
            trace!("{}: nothing to do", what);
        }
        changed
    }

    fn commit(&mut self, what: &str) {
        trace!("{}", what);
        self.persist();
        for (_, listener) in &mut self.listeners {
            listener(&self.snapshot);
        }
    }

    fn persist(&mut self) {
        match self.bridge.save(&self.snapshot) {
            Ok(()) => {}
            Err(PersistError::Disabled) => trace!("persistence disabled, change kept in memory"),
            Err(e) => warn!("could not save: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::persist::{KEY_DARK_MODE, KEY_TASKS};
    use crate::io::storage::MemoryStore;
    use chrono::TimeZone;
    use std::cell::Cell;
    use std::rc::Rc;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap()
    }

    fn store() -> TaskStore<MemoryStore> {
        TaskStore::open(MemoryStore::new(), StoreConfig::default()).with_clock(fixed_clock)
    }

    fn counter(store: &mut TaskStore<MemoryStore>) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        store.subscribe(move |_| c.set(c.get() + 1));
        count
    }

    #[test]
    fn open_writes_defaults() {
        let store = store();
        assert_eq!(store.storage().raw(KEY_TASKS), Some("[]"));
        assert_eq!(store.storage().raw(KEY_DARK_MODE), Some("false"));
    }

    #[test]
    fn successful_mutation_saves_and_notifies() {
        let mut store = store();
        let count = counter(&mut store);

        let id = store.add_task("Buy milk", Some("Errands")).unwrap();
        assert_eq!(count.get(), 1);
        assert!(store.storage().raw(KEY_TASKS).unwrap().contains("Buy milk"));
        assert_eq!(id, fixed_clock().timestamp_millis());

        assert!(store.toggle_task(id));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn rejected_and_noop_calls_do_not_notify() {
        let mut store = store();
        let count = counter(&mut store);

        assert!(store.add_task("  ", None).is_err());
        assert!(!store.toggle_task(42));
        assert!(!store.delete_task(42));
        assert!(store.add_group("Work").is_err());
        assert_eq!(store.rename_group("Gym", "Fitness"), Ok(false));
        assert!(!store.delete_group("Gym"));
        assert!(!store.set_dark_mode(false));
        assert_eq!(store.set_list_title("My Tasks"), Ok(false));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = store();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let id = store.subscribe(move |_| c.set(c.get() + 1));
        store.toggle_dark_mode();
        assert!(store.unsubscribe(id));
        store.toggle_dark_mode();
        assert_eq!(count.get(), 1);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn listener_sees_post_mutation_state() {
        let mut store = store();
        let seen = Rc::new(Cell::new(0usize));
        let s = seen.clone();
        store.subscribe(move |snap| s.set(snap.tasks.len()));
        store.add_task("One", None).unwrap();
        store.add_task("Two", None).unwrap();
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn apply_drop_cross_group_is_atomic() {
        let mut store = store();
        let a = store.add_task("A", Some("Work")).unwrap();
        let b = store.add_task("B", Some("School")).unwrap();
        let c = store.add_task("C", Some("School")).unwrap();
        let count = counter(&mut store);

        // prepend order: School is [c, b]; drop a onto b
        assert!(store.apply_drop(DropAction::MoveToGroupAt {
            id: a,
            group: "School".into(),
            ids: vec![c, a, b],
        }));
        assert_eq!(store.snapshot().group_ids("School"), vec![c, a, b]);
        assert_eq!(count.get(), 1);

        assert!(!store.apply_drop(DropAction::MoveToGroupAt {
            id: 999,
            group: "School".into(),
            ids: vec![999],
        }));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn storage_failure_keeps_working_in_memory() {
        let mut store = store();
        let count = counter(&mut store);
        store.bridge.store_mut().set_unavailable(true);

        let id = store.add_task("Still works", None).unwrap();
        assert!(!store.is_persistent());
        assert!(store.snapshot().task(id).is_some());
        assert!(store.toggle_task(id));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn suggestion_lands_in_requested_group() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut store = store();
        let mut rng = StdRng::seed_from_u64(1);
        let id = store.add_suggestion(Some("School"), &mut rng).unwrap();
        let task = store.snapshot().task(id).unwrap();
        assert_eq!(task.group, "School");
        assert!(suggest::SUGGESTIONS.contains(&task.text.as_str()));
    }
}
