use crate::model::snapshot::Snapshot;

/// Validation errors for group names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupError {
    #[error("group name is empty")]
    EmptyName,
    #[error("group already exists: {0}")]
    AlreadyExists(String),
    #[error("new name is the same as the old one: {0}")]
    Unchanged(String),
}

/// Append a new group. The name is trimmed before use.
pub fn add_group(snap: &mut Snapshot, name: &str) -> Result<(), GroupError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GroupError::EmptyName);
    }
    if !snap.groups.push(name.to_string()) {
        return Err(GroupError::AlreadyExists(name.to_string()));
    }
    Ok(())
}

/// Rename a group in place and re-tag every task that pointed at it.
/// Returns Ok(false) if `old` does not exist.
pub fn rename_group(snap: &mut Snapshot, old: &str, new: &str) -> Result<bool, GroupError> {
    let new = new.trim();
    if new.is_empty() {
        return Err(GroupError::EmptyName);
    }
    if new == old {
        return Err(GroupError::Unchanged(new.to_string()));
    }
    if snap.groups.contains(new) {
        return Err(GroupError::AlreadyExists(new.to_string()));
    }
    if !snap.groups.replace(old, new.to_string()) {
        return Ok(false);
    }
    for task in snap.tasks.iter_mut().filter(|t| t.group == old) {
        task.group = new.to_string();
    }
    Ok(true)
}

/// Remove a group together with all of its tasks.
/// Returns false if the group does not exist.
pub fn delete_group(snap: &mut Snapshot, name: &str) -> bool {
    if !snap.groups.remove(name) {
        return false;
    }
    snap.tasks.retain(|t| t.group != name);
    true
}
