use serde::Serialize;

use crate::model::snapshot::{GroupStats, Snapshot};
use crate::model::task::Task;
use crate::util::unicode::display_width;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListJson<'a> {
    pub list_title: &'a str,
    pub dark_mode: bool,
    pub groups: Vec<GroupJson<'a>>,
}

#[derive(Serialize)]
pub struct GroupJson<'a> {
    pub name: &'a str,
    pub stats: GroupStats,
    /// Display order: incomplete first
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct GroupInfoJson<'a> {
    pub name: &'a str,
    pub stats: GroupStats,
}

#[derive(Serialize)]
pub struct ChangeJson {
    pub changed: bool,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn group_to_json<'a>(snap: &'a Snapshot, name: &'a str) -> GroupJson<'a> {
    GroupJson {
        name,
        stats: snap.group_stats(name),
        tasks: snap.display_order(name),
    }
}

pub fn list_to_json<'a>(snap: &'a Snapshot, only: Option<&'a str>) -> ListJson<'a> {
    ListJson {
        list_title: &snap.list_title,
        dark_mode: snap.dark_mode,
        groups: snap
            .groups
            .iter()
            .filter(|g| only.is_none_or(|o| o == *g))
            .map(|g| group_to_json(snap, g))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    format!("[{}] {} {}", task.checkbox_char(), task.id, task.text)
}

/// Title underlined to its display width
pub fn format_title(title: &str) -> Vec<String> {
    vec![title.to_string(), "=".repeat(display_width(title))]
}

pub fn format_group_header(name: &str, stats: &GroupStats) -> String {
    format!("{} ({}/{})", name, stats.completed, stats.total)
}

/// Format one group: header, then tasks in display order
pub fn format_group(snap: &Snapshot, name: &str) -> Vec<String> {
    let mut lines = vec![format_group_header(name, &snap.group_stats(name))];
    let tasks = snap.display_order(name);
    if tasks.is_empty() {
        lines.push("  (drop tasks here)".to_string());
    }
    for task in tasks {
        lines.push(format!("  {}", format_task_line(task)));
    }
    lines
}

/// Format the whole list, or a single group of it
pub fn format_list(snap: &Snapshot, only: Option<&str>) -> Vec<String> {
    let mut lines = format_title(&snap.list_title);
    for group in snap.groups.iter().filter(|g| only.is_none_or(|o| o == *g)) {
        lines.push(String::new());
        lines.extend(format_group(snap, group));
    }
    lines
}

pub fn theme_name(dark: bool) -> &'static str {
    if dark { "dark" } else { "light" }
}
