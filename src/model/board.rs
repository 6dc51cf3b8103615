use std::path::PathBuf;

use super::config::BoardConfig;
use super::task::Task;

/// A fully loaded board
#[derive(Debug)]
pub struct Board {
    /// Directory containing `dueq/`
    pub root: PathBuf,
    /// Path to the `dueq/` directory
    pub board_dir: PathBuf,
    /// Parsed board.toml
    pub config: BoardConfig,
    /// The task set, in stored order
    pub tasks: Vec<Task>,
}
