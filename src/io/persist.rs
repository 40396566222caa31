use std::collections::HashSet;

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::io::storage::{KeyValueStore, StorageError};
use crate::model::config::StoreConfig;
use crate::model::groups::Groups;
use crate::model::snapshot::Snapshot;
use crate::model::task::{Task, TaskId};
use crate::ops::task_ops::id_after;

pub const KEY_TASKS: &str = "tasks";
pub const KEY_GROUPS: &str = "groups";
pub const KEY_DARK_MODE: &str = "darkMode";
pub const KEY_LIST_TITLE: &str = "listTitle";

/// Error type for persistence
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("malformed value for {key}: {source}")]
    Malformed {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("could not encode {key}: {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("refusing to save before the initial load has completed")]
    NotLoaded,
    #[error("persistence disabled for this session after an earlier storage failure")]
    Disabled,
}

/// Result of a load: the state to start from plus every key that had to
/// fall back to its default.
#[derive(Debug)]
pub struct LoadOutcome {
    pub snapshot: Snapshot,
    pub recovered: Vec<PersistError>,
}

/// Reads and writes a [`Snapshot`] as four independently keyed JSON values.
#[derive(Debug)]
pub struct PersistenceBridge<S: KeyValueStore> {
    store: S,
    loaded: bool,
    disabled: bool,
}

impl<S: KeyValueStore> PersistenceBridge<S> {
    pub fn new(store: S) -> Self {
        PersistenceBridge {
            store,
            loaded: false,
            disabled: false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// True once storage has failed and the session is in-memory only.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Read all four keys. Never fails: a missing key uses its default, a
    /// malformed key is set aside under `<key>.corrupt` and uses its default,
    /// and an unreadable store disables saving so that defaults never
    /// overwrite data that could not be read.
    pub fn load(&mut self, config: &StoreConfig) -> LoadOutcome {
        let defaults = Snapshot::first_run(config);
        let mut recovered = Vec::new();

        let mut tasks: Vec<Task> = self.load_key(KEY_TASKS, defaults.tasks, &mut recovered);
        let mut groups: Groups = self.load_key(KEY_GROUPS, defaults.groups, &mut recovered);
        let dark_mode: bool = self.load_key(KEY_DARK_MODE, defaults.dark_mode, &mut recovered);
        let list_title: String =
            self.load_key(KEY_LIST_TITLE, defaults.list_title, &mut recovered);

        repair_duplicate_ids(&mut tasks);

        // Tasks must point at existing groups; restore any the group list lost.
        for task in &tasks {
            if !groups.contains(&task.group) {
                warn!(
                    "task {} references missing group {:?}; restoring the group",
                    task.id, task.group
                );
                groups.push(task.group.clone());
            }
        }

        self.loaded = true;
        debug!(
            "loaded {} tasks in {} groups ({} keys recovered)",
            tasks.len(),
            groups.len(),
            recovered.len()
        );

        LoadOutcome {
            snapshot: Snapshot {
                tasks,
                groups,
                dark_mode,
                list_title,
            },
            recovered,
        }
    }

    /// Write all four keys.
    pub fn save(&mut self, snap: &Snapshot) -> Result<(), PersistError> {
        if !self.loaded {
            return Err(PersistError::NotLoaded);
        }
        if self.disabled {
            return Err(PersistError::Disabled);
        }
        let result = self.save_all(snap);
        if let Err(PersistError::Storage(e)) = &result {
            warn!("storage write failed, continuing in memory only: {}", e);
            self.disabled = true;
        }
        if result.is_ok() {
            debug!("saved {} tasks", snap.tasks.len());
        }
        result
    }

    fn save_all(&mut self, snap: &Snapshot) -> Result<(), PersistError> {
        self.save_key(KEY_TASKS, &snap.tasks)?;
        self.save_key(KEY_GROUPS, &snap.groups)?;
        self.save_key(KEY_DARK_MODE, &snap.dark_mode)?;
        self.save_key(KEY_LIST_TITLE, &snap.list_title)?;
        Ok(())
    }

    fn load_key<T: DeserializeOwned>(
        &mut self,
        key: &'static str,
        default: T,
        recovered: &mut Vec<PersistError>,
    ) -> T {
        let bytes = match self.store.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return default,
            Err(e) => {
                warn!("could not read {}, using default and disabling saves: {}", key, e);
                self.disabled = true;
                recovered.push(PersistError::Storage(e));
                return default;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(source) => {
                warn!("malformed {} in storage, using default: {}", key, source);
                let aside = format!("{}.corrupt", key);
                if let Err(e) = self.store.set(&aside, &bytes) {
                    warn!("could not preserve malformed {}: {}", key, e);
                }
                recovered.push(PersistError::Malformed { key, source });
                default
            }
        }
    }

    fn save_key<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), PersistError> {
        let bytes =
            serde_json::to_vec(value).map_err(|source| PersistError::Encode { key, source })?;
        self.store.set(key, &bytes)?;
        Ok(())
    }
}

/// Ids must be unique. The first task holding an id keeps it; later ones
/// get fresh ids past the current maximum.
fn repair_duplicate_ids(tasks: &mut [Task]) {
    let mut in_use: HashSet<TaskId> = tasks.iter().map(|t| t.id).collect();
    let mut max = tasks.iter().map(|t| t.id).max().unwrap_or(0);
    let mut seen = HashSet::new();
    for task in tasks.iter_mut() {
        if seen.insert(task.id) {
            continue;
        }
        let fresh = id_after(max, |id| in_use.contains(&id));
        warn!("duplicate task id {}; reassigning to {}", task.id, fresh);
        task.id = fresh;
        in_use.insert(fresh);
        seen.insert(fresh);
        max = max.max(fresh);
    }
}
