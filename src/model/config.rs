use serde::{Deserialize, Serialize};

use super::task::Priority;

/// Configuration from board.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub board: BoardInfo,
    #[serde(default)]
    pub ids: IdConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdConfig {
    /// Default: see the board.toml template in `cli::handlers::init`
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for IdConfig {
    fn default() -> Self {
        IdConfig {
            prefix: default_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Priority given to new tasks added without one
    #[serde(default = "default_priority")]
    pub priority: i32,
}

impl DefaultsConfig {
    pub fn priority(&self) -> Priority {
        Priority::from_value(&serde_json::Value::from(self.priority))
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            priority: default_priority(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// chrono format string for due dates in listings
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Titles wider than this many terminal cells are truncated in listings
    #[serde(default = "default_title_width")]
    pub title_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            date_format: default_date_format(),
            title_width: default_title_width(),
        }
    }
}

fn default_prefix() -> String {
    "T".to_string()
}

fn default_priority() -> i32 {
    2
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_title_width() -> usize {
    40
}
