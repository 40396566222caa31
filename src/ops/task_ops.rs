use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::model::config::{InsertOrder, StoreConfig};
use crate::model::snapshot::Snapshot;
use crate::model::task::{Task, TaskId};
use crate::util::unicode::grapheme_len;

/// Validation errors for task text and placement
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task text is empty")]
    EmptyText,
    #[error("task text is {len} characters long (maximum {max})")]
    TextTooLong { max: usize, len: usize },
    #[error("no such group: {0}")]
    UnknownGroup(String),
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Trim `text` and check it against the configured length limit.
/// Length is counted in grapheme clusters, so an emoji counts once.
pub fn validate_text<'a>(text: &'a str, config: &StoreConfig) -> Result<&'a str, TaskError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyText);
    }
    let len = grapheme_len(trimmed);
    if len > config.max_text_len {
        return Err(TaskError::TextTooLong {
            max: config.max_text_len,
            len,
        });
    }
    Ok(trimmed)
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Add a task. Returns the assigned id.
///
/// With no `group`, the first group is used; if there are no groups at all,
/// the configured fallback group is created so that every task still points
/// at an existing group.
pub fn add_task(
    snap: &mut Snapshot,
    text: &str,
    group: Option<&str>,
    config: &StoreConfig,
    now: DateTime<Utc>,
) -> Result<TaskId, TaskError> {
    let text = validate_text(text, config)?;

    let group = match group {
        Some(g) if snap.groups.contains(g) => g.to_string(),
        Some(g) => return Err(TaskError::UnknownGroup(g.to_string())),
        None => match snap.groups.first() {
            Some(g) => g.to_string(),
            None => {
                snap.groups.push(config.fallback_group.clone());
                config.fallback_group.clone()
            }
        },
    };

    let id = next_id(snap, now);
    let task = Task::new(id, text.to_string(), group, now);
    match config.insert_order {
        InsertOrder::Prepend => snap.tasks.insert(0, task),
        InsertOrder::Append => snap.tasks.push(task),
    }
    Ok(id)
}

/// Flip a task's completion flag. Returns false if the id is unknown.
pub fn toggle_task(snap: &mut Snapshot, id: TaskId) -> bool {
    match snap.tasks.iter_mut().find(|t| t.id == id) {
        Some(task) => {
            task.completed = !task.completed;
            true
        }
        None => false,
    }
}

/// Remove a task. Returns false if the id is unknown.
pub fn delete_task(snap: &mut Snapshot, id: TaskId) -> bool {
    let before = snap.tasks.len();
    snap.tasks.retain(|t| t.id != id);
    snap.tasks.len() != before
}

// ---------------------------------------------------------------------------
// Moves
// ---------------------------------------------------------------------------

/// Reassign a task to another existing group. The task keeps its place in
/// the stored sequence and its completion flag.
/// Returns false if the task or group is unknown, or the task is already there.
pub fn move_task_to_group(snap: &mut Snapshot, id: TaskId, group: &str) -> bool {
    if !snap.groups.contains(group) {
        return false;
    }
    match snap.tasks.iter_mut().find(|t| t.id == id) {
        Some(task) if task.group != group => {
            task.group = group.to_string();
            true
        }
        _ => false,
    }
}

/// Rewrite the relative order of `group`'s tasks to follow `ordered`.
///
/// Only the slots currently held by listed tasks of `group` are rewritten;
/// unlisted tasks and tasks of other groups keep their positions. Ids that
/// are unknown, belong to another group, or repeat are ignored.
/// Returns true if the stored order changed.
pub fn reorder_within_group(snap: &mut Snapshot, group: &str, ordered: &[TaskId]) -> bool {
    let mut seen = HashSet::new();
    let wanted: Vec<TaskId> = ordered
        .iter()
        .copied()
        .filter(|id| {
            snap.tasks.iter().any(|t| t.id == *id && t.group == group) && seen.insert(*id)
        })
        .collect();

    let slots: Vec<usize> = snap
        .tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.group == group && seen.contains(&t.id))
        .map(|(i, _)| i)
        .collect();

    let current: Vec<TaskId> = slots.iter().map(|&i| snap.tasks[i].id).collect();
    if current == wanted {
        return false;
    }

    let mut pulled: Vec<Option<Task>> = slots
        .iter()
        .map(|&i| Some(snap.tasks[i].clone()))
        .collect();
    for (slot, id) in slots.iter().zip(&wanted) {
        let from = current.iter().position(|c| c == id);
        if let Some(task) = from.and_then(|idx| pulled[idx].take()) {
            snap.tasks[*slot] = task;
        }
    }
    true
}

/// Move the element at `from` to `to`, shifting the others.
/// Out-of-range indices leave the slice untouched.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Next free id: the creation time in milliseconds, or one past the largest
/// existing id when the clock has not moved past it.
fn next_id(snap: &Snapshot, now: DateTime<Utc>) -> TaskId {
    let candidate = now.timestamp_millis();
    match snap.tasks.iter().map(|t| t.id).max() {
        Some(max) if candidate <= max => id_after(max, |id| snap.task(id).is_some()),
        _ => candidate,
    }
}

/// One past `max`. When that would overflow, the lowest positive id for
/// which `in_use` is false.
pub fn id_after(max: TaskId, in_use: impl Fn(TaskId) -> bool) -> TaskId {
    match max.checked_add(1) {
        Some(id) => id,
        None => (1..TaskId::MAX).find(|id| !in_use(*id)).unwrap_or(0),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
