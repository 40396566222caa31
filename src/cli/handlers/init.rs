use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, CONFIG_FILE};
use crate::io::storage::atomic_write;

const CONFIG_TEMPLATE: &str = r##"# gt configuration. Every setting is optional; the values shown are the defaults.

# Maximum task text length, counted in user-perceived characters.
# Longer text is rejected, never truncated.
max_text_len = 200

# Where new tasks go: "prepend" (newest first) or "append".
insert_order = "prepend"

# Groups created on first run, before anything has been saved.
default_groups = ["Work", "School", "Errands"]

# Title shown above the list on first run.
default_title = "My Tasks"

# Group created when a task is added while no groups exist.
fallback_group = "Work"
"##;

/// Create the data directory and write the config template.
pub fn cmd_init(dir: &Path, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        )
        .into());
    }
    atomic_write(&config_path, CONFIG_TEMPLATE.as_bytes())?;
    // the template must stay loadable
    config_io::read_config(dir)?;
    println!("Initialized {}", dir.display());
    Ok(())
}
