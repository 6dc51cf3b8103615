use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::board::Board;
use crate::model::config::BoardConfig;
use crate::model::task::Task;

/// Name of the board directory
pub const BOARD_DIR: &str = "dueq";
pub const CONFIG_FILE: &str = "board.toml";
pub const TASKS_FILE: &str = "tasks.json";

/// Error type for board I/O operations
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("not a dueq board: no dueq/board.toml found")]
    NotABoard,
    #[error("a board already exists in {0}")]
    AlreadyExists(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse board.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not edit board.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error("could not parse {path}: {source}")]
    TasksParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize tasks: {0}")]
    TasksSerializeError(#[from] serde_json::Error),
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
}

/// Find the board by walking up from `start`, looking for `dueq/board.toml`.
pub fn discover_board(start: &Path) -> Result<PathBuf, BoardError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(BOARD_DIR).join(CONFIG_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(BoardError::NotABoard);
        }
    }
}

/// Load config and task set from the board rooted at `root`.
pub fn load_board(root: &Path) -> Result<Board, BoardError> {
    let board_dir = root.join(BOARD_DIR);
    if !board_dir.is_dir() {
        return Err(BoardError::NotABoard);
    }

    let config_path = board_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| BoardError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: BoardConfig = toml::from_str(&config_text)?;

    let tasks = load_tasks(&board_dir)?;
    log::debug!("loaded {} tasks from {}", tasks.len(), board_dir.display());

    Ok(Board {
        root: root.to_path_buf(),
        board_dir,
        config,
        tasks,
    })
}

/// Read `tasks.json`. A missing file is an empty task set.
pub fn load_tasks(board_dir: &Path) -> Result<Vec<Task>, BoardError> {
    let path = board_dir.join(TASKS_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(&path).map_err(|e| BoardError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&text).map_err(|e| BoardError::TasksParseError { path, source: e })
}

/// Write the task set to `tasks.json`.
pub fn save_tasks(board_dir: &Path, tasks: &[Task]) -> Result<(), BoardError> {
    let path = board_dir.join(TASKS_FILE);
    let mut content = serde_json::to_string_pretty(tasks)?;
    content.push('\n');
    atomic_write(&path, content.as_bytes())
        .map_err(|e| BoardError::WriteError { path, source: e })?;
    log::debug!("saved {} tasks", tasks.len());
    Ok(())
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
