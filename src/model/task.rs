use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task identifier: milliseconds since the Unix epoch at creation, bumped
/// past the current maximum when two tasks are created in the same tick.
pub type TaskId = i64;

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable identifier, assigned at creation
    pub id: TaskId,
    /// Trimmed, non-empty task text
    pub text: String,
    /// Name of the group this task belongs to
    pub group: String,
    /// Completion flag
    #[serde(default)]
    pub completed: bool,
    /// Creation timestamp (RFC 3339 on disk)
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new, incomplete task
    pub fn new(id: TaskId, text: String, group: String, created_at: DateTime<Utc>) -> Self {
        Task {
            id,
            text,
            group,
            completed: false,
            created_at,
        }
    }

    pub fn checkbox_char(&self) -> char {
        if self.completed { 'x' } else { ' ' }
    }
}
