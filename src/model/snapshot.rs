use serde::{Deserialize, Serialize};

use super::config::StoreConfig;
use super::groups::Groups;
use super::task::{Task, TaskId};

/// The complete persisted state of a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// All tasks, in stored order
    pub tasks: Vec<Task>,
    pub groups: Groups,
    pub dark_mode: bool,
    pub list_title: String,
}

/// Completion counts for one group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    pub total: usize,
    pub completed: usize,
}

impl Snapshot {
    /// The first-run state: no tasks, the configured default groups,
    /// light theme, default title.
    pub fn first_run(config: &StoreConfig) -> Self {
        Snapshot {
            tasks: Vec::new(),
            groups: config.default_groups.iter().cloned().collect(),
            dark_mode: false,
            list_title: config.default_title.clone(),
        }
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks of one group, in stored order
    pub fn group_tasks<'a>(&'a self, group: &str) -> impl Iterator<Item = &'a Task> {
        self.tasks.iter().filter(move |t| t.group == group)
    }

    /// Ids of one group's tasks, in stored order
    pub fn group_ids(&self, group: &str) -> Vec<TaskId> {
        self.group_tasks(group).map(|t| t.id).collect()
    }

    /// Tasks of one group as they are shown: incomplete first, then
    /// completed, each part keeping stored order.
    pub fn display_order(&self, group: &str) -> Vec<&Task> {
        let (mut open, done): (Vec<&Task>, Vec<&Task>) =
            self.group_tasks(group).partition(|t| !t.completed);
        open.extend(done);
        open
    }

    pub fn group_stats(&self, group: &str) -> GroupStats {
        self.group_tasks(group).fold(GroupStats::default(), |mut s, t| {
            s.total += 1;
            if t.completed {
                s.completed += 1;
            }
            s
        })
    }
}
