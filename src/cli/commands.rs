use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::task::TaskId;

#[derive(Parser)]
#[command(name = "gt", about = concat!("gt v", env!("CARGO_PKG_VERSION"), " - grouped to-do lists"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Data directory (default: ./.grouptask)
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<PathBuf>,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory and a commented config.toml
    Init(InitArgs),
    /// Show the list (default when no command is given)
    List(ListArgs),
    /// Add a task
    Add(AddArgs),
    /// Add a random suggestion
    Suggest(SuggestArgs),
    /// Mark a task done, or not done again
    Toggle(IdArgs),
    /// Delete a task
    Rm(IdArgs),
    /// Group management
    Group(GroupCmd),
    /// Move a task to another group
    Mv(MvArgs),
    /// Set the order of a group's tasks
    Reorder(ReorderArgs),
    /// Drag a task onto another task or a group's drop zone
    Drag(DragArgs),
    /// Show or set the list title
    Title(TitleArgs),
    /// Show or change the theme
    Theme(ThemeArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only show this group
    pub group: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Group (default: first group)
    #[arg(short, long)]
    pub group: Option<String>,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Group (default: first group)
    #[arg(short, long)]
    pub group: Option<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID
    pub id: TaskId,
}

#[derive(Args)]
pub struct GroupCmd {
    #[command(subcommand)]
    pub action: GroupAction,
}

#[derive(Subcommand)]
pub enum GroupAction {
    /// List groups with task counts
    List,
    /// Create a group
    Add {
        name: String,
    },
    /// Rename a group (tasks follow)
    Rename {
        old: String,
        new: String,
    },
    /// Delete a group and all of its tasks
    Rm {
        name: String,
    },
}

#[derive(Args)]
pub struct MvArgs {
    /// Task ID
    pub id: TaskId,
    /// Destination group
    pub group: String,
}

#[derive(Args)]
pub struct ReorderArgs {
    /// Group to reorder
    pub group: String,
    /// Task IDs in the desired order
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<TaskId>,
}

#[derive(Args)]
pub struct DragArgs {
    /// Task being dragged
    pub id: TaskId,
    /// Drop onto this task
    #[arg(long, conflicts_with_all = ["zone", "cancel"])]
    pub onto: Option<TaskId>,
    /// Drop onto this group's drop zone
    #[arg(long, conflicts_with = "cancel")]
    pub zone: Option<String>,
    /// Release outside any target
    #[arg(long)]
    pub cancel: bool,
}

#[derive(Args)]
pub struct TitleArgs {
    /// New title (omit to print the current one)
    pub title: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeMode {
    Dark,
    Light,
    Toggle,
}

#[derive(Args)]
pub struct ThemeArgs {
    /// Theme to switch to (omit to print the current one)
    pub mode: Option<ThemeMode>,
}
