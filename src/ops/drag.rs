//! Drag-and-drop gesture resolution.
//!
//! A gesture is started on one task and ends either over nothing, over a
//! group's empty drop zone, or over another task. The controller turns the
//! end of the gesture into at most one [`DropAction`] for the store to apply.
//! Anything that cannot be resolved is a silent no-op.

use crate::model::snapshot::Snapshot;
use crate::model::task::TaskId;
use crate::ops::task_ops::array_move;

/// What the pointer was over when the gesture ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Another task row
    Task(TaskId),
    /// The placeholder shown for a group, used to populate empty groups
    GroupZone(String),
}

/// The single mutation a finished gesture resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    /// Reorder one group's tasks to exactly `ids`
    Reorder { group: String, ids: Vec<TaskId> },
    /// Reassign a task's group without touching its stored position
    MoveToGroup { id: TaskId, group: String },
    /// Reassign a task's group, then order the destination group as `ids`
    /// (which includes the moved task at the drop position)
    MoveToGroupAt {
        id: TaskId,
        group: String,
        ids: Vec<TaskId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { active: TaskId },
}

/// Tracks the single in-flight drag gesture
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        DragController::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Begin dragging `id`. A gesture already in flight is abandoned.
    pub fn start(&mut self, id: TaskId) {
        self.state = DragState::Dragging { active: id };
    }

    /// Abandon the current gesture without any mutation.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Finish the gesture over `over` and return to idle.
    pub fn end(&mut self, snap: &Snapshot, over: Option<&DropTarget>) -> Option<DropAction> {
        let state = std::mem::take(&mut self.state);
        match (state, over) {
            (DragState::Dragging { active }, Some(target)) => resolve_drop(snap, active, target),
            _ => None,
        }
    }
}

/// Resolve a drop of `active` onto `target` against the current state.
///
/// Cross-group drops onto a task insert the dragged task at the target's
/// index in the destination group, pushing the target down by one.
pub fn resolve_drop(snap: &Snapshot, active: TaskId, target: &DropTarget) -> Option<DropAction> {
    let dragged = snap.task(active)?;

    match target {
        DropTarget::GroupZone(group) => {
            if dragged.group == *group || !snap.groups.contains(group) {
                return None;
            }
            Some(DropAction::MoveToGroup {
                id: active,
                group: group.clone(),
            })
        }
        DropTarget::Task(over) => {
            if *over == active {
                return None;
            }
            let over_task = snap.task(*over)?;

            if over_task.group == dragged.group {
                let mut ids = snap.group_ids(&dragged.group);
                let old_index = ids.iter().position(|id| *id == active)?;
                let new_index = ids.iter().position(|id| id == over)?;
                if old_index == new_index {
                    return None;
                }
                array_move(&mut ids, old_index, new_index);
                Some(DropAction::Reorder {
                    group: dragged.group.clone(),
                    ids,
                })
            } else {
                let mut ids = snap.group_ids(&over_task.group);
                let drop_index = ids.iter().position(|id| id == over)?;
                ids.insert(drop_index, active);
                Some(DropAction::MoveToGroupAt {
                    id: active,
                    group: over_task.group.clone(),
                    ids,
                })
            }
        }
    }
}
