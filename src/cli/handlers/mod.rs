mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use log::debug;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::lock::FileLock;
use crate::io::storage::DirStore;
use crate::model::task::TaskId;
use crate::ops::drag::{DragController, DropTarget};
use crate::store::TaskStore;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Data directory used when `--dir` is not given
pub const DEFAULT_DIR: &str = ".grouptask";

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let dir = cli.dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DIR));

    match cli.command {
        None => cmd_list(&dir, ListArgs { group: None }, json),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(&dir, args),
            Commands::List(args) => cmd_list(&dir, args, json),
            Commands::Add(args) => cmd_add(&dir, args, json),
            Commands::Suggest(args) => cmd_suggest(&dir, args, json),
            Commands::Toggle(args) => cmd_toggle(&dir, args, json),
            Commands::Rm(args) => cmd_rm(&dir, args, json),
            Commands::Group(args) => cmd_group(&dir, args, json),
            Commands::Mv(args) => cmd_mv(&dir, args, json),
            Commands::Reorder(args) => cmd_reorder(&dir, args, json),
            Commands::Drag(args) => cmd_drag(&dir, args, json),
            Commands::Title(args) => cmd_title(&dir, args, json),
            Commands::Theme(args) => cmd_theme(&dir, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Open the store under the directory lock. The lock is held until the
/// returned guard is dropped, covering the load, the mutation and the save.
fn open_store(dir: &Path) -> Result<(FileLock, TaskStore<DirStore>), Box<dyn std::error::Error>> {
    let storage = DirStore::open(dir)?;
    let lock = FileLock::acquire_default(dir)?;
    let config = config_io::read_config(dir)?;
    debug!("opening store in {}", dir.display());
    Ok((lock, TaskStore::open(storage, config)))
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report the outcome of a call whose only failure mode is "nothing to do".
fn report_change(changed: bool, message: &str, json: bool) -> CmdResult {
    if json {
        return print_json(&ChangeJson { changed });
    }
    if changed {
        println!("{}", message);
    } else {
        println!("no change");
    }
    Ok(())
}

fn warn_if_memory_only(store: &TaskStore<DirStore>) {
    if !store.is_persistent() {
        eprintln!("warning: storage unavailable, changes were not saved");
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(dir: &Path, args: ListArgs, json: bool) -> CmdResult {
    let (_lock, store) = open_store(dir)?;
    let snap = store.snapshot();
    if let Some(ref g) = args.group {
        if !snap.groups.contains(g) {
            return Err(format!("group not found: {}", g).into());
        }
    }
    if json {
        return print_json(&list_to_json(snap, args.group.as_deref()));
    }
    for line in format_list(snap, args.group.as_deref()) {
        println!("{}", line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_add(dir: &Path, args: AddArgs, json: bool) -> CmdResult {
    let (_lock, mut store) = open_store(dir)?;
    let id = store.add_task(&args.text, args.group.as_deref())?;
    warn_if_memory_only(&store);
    print_added(&store, id, json)
}

fn cmd_suggest(dir: &Path, args: SuggestArgs, json: bool) -> CmdResult {
    let (_lock, mut store) = open_store(dir)?;
    let id = store.add_suggestion(args.group.as_deref(), &mut rand::rng())?;
    warn_if_memory_only(&store);
    print_added(&store, id, json)
}

fn print_added(store: &TaskStore<DirStore>, id: TaskId, json: bool) -> CmdResult {
    let task = store
        .snapshot()
        .task(id)
        .ok_or_else(|| format!("task not found after add: {}", id))?;
    if json {
        return print_json(task);
    }
    println!("{}", format_task_line(task));
    Ok(())
}

fn cmd_toggle(dir: &Path, args: IdArgs, json: bool) -> CmdResult {
    let (_lock, mut store) = open_store(dir)?;
    let changed = store.toggle_task(args.id);
    warn_if_memory_only(&store);
    let message = store
        .snapshot()
        .task(args.id)
        .map(format_task_line)
        .unwrap_or_default();
    report_change(changed, &message, json)
}

fn cmd_rm(dir: &Path, args: IdArgs, json: bool) -> CmdResult {
    let (_lock, mut store) = open_store(dir)?;
    let changed = store.delete_task(args.id);
    warn_if_memory_only(&store);
    report_change(changed, &format!("{} deleted", args.id), json)
}

fn cmd_mv(dir: &Path, args: MvArgs, json: bool) -> CmdResult {
    let (_lock, mut store) = open_store(dir)?;
    let changed = store.move_task_to_group(args.id, &args.group);
    warn_if_memory_only(&store);
    report_change(
        changed,
        &format!("{} moved to {}", args.id, args.group),
        json,
    )
}

fn cmd_reorder(dir: &Path, args: ReorderArgs, json: bool) -> CmdResult {
    let (_lock, mut store) = open_store(dir)?;
    let changed = store.reorder_within_group(&args.group, &args.ids);
    warn_if_memory_only(&store);
    report_change(changed, &format!("{} reordered", args.group), json)
}

/// Run one drag gesture: start on `id`, end over the given target.
fn cmd_drag(dir: &Path, args: DragArgs, json: bool) -> CmdResult {
    let (_lock, mut store) = open_store(dir)?;

    let target = match (args.onto, args.zone) {
        (Some(id), _) => Some(DropTarget::Task(id)),
        (None, Some(group)) => Some(DropTarget::GroupZone(group)),
        (None, None) => None,
    };

    let mut drag = DragController::new();
    drag.start(args.id);
    let action = if args.cancel {
        drag.cancel();
        None
    } else {
        drag.end(store.snapshot(), target.as_ref())
    };
    debug!("drag {} resolved to {:?}", args.id, action);

    let changed = action.is_some_and(|a| store.apply_drop(a));
    warn_if_memory_only(&store);
    report_change(changed, &format!("{} dropped", args.id), json)
}

// ---------------------------------------------------------------------------
// Group commands
// ---------------------------------------------------------------------------

fn cmd_group(dir: &Path, cmd: GroupCmd, json: bool) -> CmdResult {
    let (_lock, mut store) = open_store(dir)?;

    match cmd.action {
        GroupAction::List => {
            let snap = store.snapshot();
            if json {
                let groups: Vec<GroupInfoJson> = snap
                    .groups
                    .iter()
                    .map(|name| GroupInfoJson {
                        name,
                        stats: snap.group_stats(name),
                    })
                    .collect();
                return print_json(&groups);
            }
            for name in snap.groups.iter() {
                println!("{}", format_group_header(name, &snap.group_stats(name)));
            }
            Ok(())
        }
        GroupAction::Add { name } => {
            store.add_group(&name)?;
            warn_if_memory_only(&store);
            report_change(true, &format!("group {} added", name.trim()), json)
        }
        GroupAction::Rename { old, new } => {
            let changed = store.rename_group(&old, &new)?;
            warn_if_memory_only(&store);
            report_change(
                changed,
                &format!("group {} renamed to {}", old, new.trim()),
                json,
            )
        }
        GroupAction::Rm { name } => {
            let changed = store.delete_group(&name);
            warn_if_memory_only(&store);
            report_change(changed, &format!("group {} deleted", name), json)
        }
    }
}

// ---------------------------------------------------------------------------
// List settings
// ---------------------------------------------------------------------------

fn cmd_title(dir: &Path, args: TitleArgs, json: bool) -> CmdResult {
    let (_lock, mut store) = open_store(dir)?;
    match args.title {
        None => {
            let title = &store.snapshot().list_title;
            if json {
                print_json(title)
            } else {
                println!("{}", title);
                Ok(())
            }
        }
        Some(title) => {
            let changed = store.set_list_title(&title)?;
            warn_if_memory_only(&store);
            let message = format!("title set to {}", store.snapshot().list_title);
            report_change(changed, &message, json)
        }
    }
}

fn cmd_theme(dir: &Path, args: ThemeArgs, json: bool) -> CmdResult {
    let (_lock, mut store) = open_store(dir)?;
    let changed = match args.mode {
        None => false,
        Some(ThemeMode::Dark) => store.set_dark_mode(true),
        Some(ThemeMode::Light) => store.set_dark_mode(false),
        Some(ThemeMode::Toggle) => {
            store.toggle_dark_mode();
            true
        }
    };
    warn_if_memory_only(&store);
    let current = theme_name(store.snapshot().dark_mode);
    if args.mode.is_none() {
        if json {
            return print_json(&current);
        }
        println!("{}", current);
        return Ok(());
    }
    report_change(changed, &format!("theme: {}", current), json)
}
