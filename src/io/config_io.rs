use std::fs;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};

use crate::io::board_io::{BoardError, CONFIG_FILE, atomic_write};
use crate::model::config::BoardConfig;

/// Keys settable through `dq config`
pub const CONFIG_KEYS: &[&str] = &[
    "board.name",
    "ids.prefix",
    "defaults.priority",
    "display.date_format",
    "display.title_width",
];

/// Error type for config edits
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown config key '{0}' (expected one of: {keys})", keys = CONFIG_KEYS.join(", "))]
    UnknownKey(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Read the board config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing.
pub fn read_config(board_dir: &Path) -> Result<(BoardConfig, toml_edit::DocumentMut), BoardError> {
    let config_path = board_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| BoardError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: BoardConfig = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(board_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), BoardError> {
    let config_path = board_dir.join(CONFIG_FILE);
    atomic_write(&config_path, doc.to_string().as_bytes()).map_err(|e| BoardError::WriteError {
        path: config_path,
        source: e,
    })
}

/// Current value of a dotted key, as displayed by `dq config <key>`.
pub fn get_value(config: &BoardConfig, key: &str) -> Result<String, ConfigError> {
    Ok(match key {
        "board.name" => config.board.name.clone(),
        "ids.prefix" => config.ids.prefix.clone(),
        "defaults.priority" => config.defaults.priority.to_string(),
        "display.date_format" => config.display.date_format.clone(),
        "display.title_width" => config.display.title_width.to_string(),
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    })
}

/// Set a dotted key in the document, creating its table if needed.
pub fn set_value(doc: &mut toml_edit::DocumentMut, key: &str, raw: &str) -> Result<(), ConfigError> {
    let (table, field) = key
        .split_once('.')
        .filter(|_| CONFIG_KEYS.contains(&key))
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    let value = match key {
        "defaults.priority" => {
            let n: i64 = raw.trim().parse().map_err(|_| invalid("expected an integer"))?;
            if n == 0 {
                return Err(invalid("priority 0 is not allowed"));
            }
            toml_edit::value(n)
        }
        "display.title_width" => {
            let n: i64 = raw.trim().parse().map_err(|_| invalid("expected a positive integer"))?;
            if n < 1 {
                return Err(invalid("expected a positive integer"));
            }
            toml_edit::value(n)
        }
        "ids.prefix" => {
            if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(invalid("use letters and digits only"));
            }
            toml_edit::value(raw)
        }
        "display.date_format" => {
            if StrftimeItems::new(raw).any(|item| matches!(item, Item::Error)) {
                return Err(invalid("not a valid strftime format"));
            }
            toml_edit::value(raw)
        }
        _ => toml_edit::value(raw),
    };

    if !doc.contains_key(table) {
        doc[table] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc[table][field] = value;
    Ok(())
}
