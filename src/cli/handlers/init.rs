use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::board_io::{self, BOARD_DIR, BoardError, CONFIG_FILE, TASKS_FILE};

const BOARD_TOML_TEMPLATE: &str = r##"[board]
name = "{name}"

[ids]
# New tasks are numbered {prefix}-001, {prefix}-002, ...
prefix = "{prefix}"

[defaults]
# Priority for tasks added without --priority (1 = most urgent)
priority = 2

[display]
# chrono strftime format for due dates in listings
date_format = "%Y-%m-%d"
# Longer titles are truncated in `dq list`
title_width = 40
"##;

/// Turn a directory name into a board name: hyphens and underscores become
/// spaces, words are capitalized.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn validate_prefix(prefix: &str) -> Result<(), String> {
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!(
            "invalid prefix \"{}\": use letters and digits only (e.g. \"T\")",
            prefix
        ));
    }
    Ok(())
}

fn render_board_toml(name: &str, prefix: &str) -> String {
    BOARD_TOML_TEMPLATE
        .replace("{name}", &name.replace('\\', "\\\\").replace('"', "\\\""))
        .replace("{prefix}", prefix)
}

pub fn cmd_init(args: InitArgs, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let board_dir = dir.join(BOARD_DIR);
    if board_dir.join(CONFIG_FILE).exists() {
        return Err(BoardError::AlreadyExists(board_dir).into());
    }
    validate_prefix(&args.prefix)?;

    if let Some(parent) = dir.parent()
        && let Ok(parent_root) = board_io::discover_board(parent)
    {
        eprintln!(
            "Note: parent board found at {}/",
            parent_root.join(BOARD_DIR).display()
        );
        eprintln!("Creating new board in ./{}/", BOARD_DIR);
    }

    let name = args.name.unwrap_or_else(|| {
        dir.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .unwrap_or_else(|| "Tasks".to_string())
    });

    fs::create_dir_all(&board_dir)?;
    board_io::atomic_write(
        &board_dir.join(CONFIG_FILE),
        render_board_toml(&name, &args.prefix).as_bytes(),
    )?;
    if !board_dir.join(TASKS_FILE).exists() {
        board_io::save_tasks(&board_dir, &[])?;
    }

    log::info!("initialized board \"{}\" in {}", name, board_dir.display());
    println!("Initialized board \"{}\" in ./{}/", name, BOARD_DIR);
    Ok(())
}
