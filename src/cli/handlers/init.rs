use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::project_io::{self, CONFIG_FILE};
use crate::model::settings::StatusEmoji;

const CONFIG_TEMPLATE: &str = r##"[project]
name = "{name}"

# --- Boards ---
# Each board is one markdown file. Lanes are `## ` headings; settings go in a
# trailing `% ... %` block, e.g. `## Doing (3) % status:wip %`.

[[boards]]
id = "main"
name = "{name}"
file = "board.md"

# --- Checkboxes ---
# done_char marks a finished card; pre_done_char is the state that toggles into it.

[tasks]
done_char = "x"
pre_done_char = " "

# --- Status emojis ---
# Lanes with `status:<id>` stamp cards with `<emoji> <date>` when they arrive.
# is_completion = true makes the lane count as done.

[[status_emojis]]
id = "{status_id}"
emoji = "{status_emoji}"
name = "{status_name}"

# --- Colors ---
# First rule for a tag wins.
#
# [[tag_colors]]
# tag_key = "#bug"
# color = "red"
# background_color = ""
#
# Date rules: is_today / is_before / is_after, or a window of `distance`
# `unit`s (hours, days, weeks, months) `before` or `after` now.
#
# [[date_colors]]
# is_today = true
# color = "green"
#
# [[date_colors]]
# distance = 7
# unit = "days"
# direction = "before"
# color = "grey"
"##;

const BOARD_TEMPLATE: &str = "\
---

kanban-plugin: basic

---

## Backlog

## In Progress % status:{status_id} %

## Done % status:completion %

";

/// Infer a project name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_config(name: &str, status: &StatusEmoji) -> String {
    CONFIG_TEMPLATE
        .replace("{name}", &name.replace('"', "\\\""))
        .replace("{status_id}", &status.id)
        .replace("{status_emoji}", &status.emoji)
        .replace("{status_name}", &status.name)
}

pub fn cmd_init(args: &InitArgs, dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let config_path = cwd.join(CONFIG_FILE);

    if config_path.exists() && !args.force {
        return Err(format!("{} already exists (use --force to overwrite)", CONFIG_FILE).into());
    }

    if let Some(parent) = cwd.parent()
        && let Ok(parent_root) = project_io::discover_project(parent)
    {
        eprintln!("Note: parent project found at {}/", parent_root.display());
    }

    let name = args.name.clone().unwrap_or_else(|| {
        cwd.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .unwrap_or_else(|| "Untitled".to_string())
    });

    let status = StatusEmoji::new_default();
    fs::write(&config_path, render_config(&name, &status))?;

    let board_path = cwd.join("board.md");
    if !board_path.exists() {
        fs::write(&board_path, BOARD_TEMPLATE.replace("{status_id}", &status.id))?;
    }

    println!("Initialized lanemark project: {}", name);
    println!("  board: main (board.md)");
    println!("  status: {} {} ({})", status.emoji, status.name, status.id);
    Ok(())
}
