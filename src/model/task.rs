use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Task urgency. Smaller numbers are more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl Priority {
    pub const HIGH: Priority = Priority(1);
    pub const MEDIUM: Priority = Priority(2);
    pub const LOW: Priority = Priority(3);

    /// Read a priority from loosely typed input. Numbers are truncated, strings
    /// are read by their leading integer. Anything unusable (including zero)
    /// falls back to the lowest urgency tier.
    pub fn from_value(value: &serde_json::Value) -> Priority {
        let parsed = match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            serde_json::Value::String(s) => leading_int(s),
            _ => None,
        };
        match parsed.and_then(|n| i32::try_from(n).ok()) {
            Some(0) | None => Priority::LOW,
            Some(n) => Priority(n),
        }
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "High",
            3 => "Low",
            _ => "Medium",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::LOW
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let priority = Priority::from_value(&value);
        if !value.is_null() && !matches!(value, serde_json::Value::Number(_)) {
            log::warn!("non-numeric priority {} read as {}", value, priority);
        }
        Ok(priority)
    }
}

/// Leading optional sign plus digits, ignoring surrounding whitespace.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().ok().map(|n| sign * n)
}

/// Parse a due date as written by a user or an older tasks file.
///
/// `YYYY-MM-DD` means local midnight and `YYYY-MM-DDTHH:MM[:SS]` is local
/// time, so a deadline lands on the calendar day it was written for. Full
/// RFC 3339 timestamps carry their own offset.
pub fn parse_due(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(local_to_utc);
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(local_to_utc)
}

/// Skipped local times (DST gaps) fall back to reading the clock as UTC.
fn local_to_utc(ndt: NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(&ndt)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&ndt))
}

/// The local calendar day a deadline falls on.
pub fn due_day(due: DateTime<Utc>) -> NaiveDate {
    due.with_timezone(&Local).date_naive()
}

mod due_format {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(due: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match due {
            Some(dt) => s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => s.serialize_none(),
        }
    }

    /// Non-string values and unreadable strings both load as "no deadline".
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<Value> = Option::deserialize(d)?;
        Ok(match raw {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => {
                let due = super::parse_due(&s);
                if due.is_none() && !s.trim().is_empty() {
                    log::warn!("unreadable due date {:?}, treating as no deadline", s);
                }
                due
            }
            Some(other) => {
                log::warn!("due date {} is not a string, treating as no deadline", other);
                None
            }
        })
    }
}

mod created_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Anything unreadable falls back to the load time.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = Value::deserialize(d)?;
        match raw.as_str().and_then(super::parse_due) {
            Some(dt) => Ok(dt),
            None => {
                log::warn!("unreadable createdAt {}, using the current time", raw);
                Ok(Utc::now())
            }
        }
    }
}

/// A task record. The scheduler reorders and removes whole records but never
/// changes their fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Absent means no deadline
    #[serde(default, rename = "dueDate", with = "due_format")]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "Utc::now", deserialize_with = "created_format::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            title: title.into(),
            description: None,
            due: None,
            priority: Priority::default(),
            created_at: Utc::now(),
        }
    }

    pub fn with_due(mut self, due: Option<DateTime<Utc>>) -> Self {
        self.due = due;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// Field replacements for an edit. `None` leaves a field alone; the nested
/// options on `description` and `due` distinguish "clear" from "keep".
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due: Option<Option<DateTime<Utc>>>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due.is_none()
            && self.priority.is_none()
    }

    /// Build the replacement record. Identity and creation time carry over.
    pub fn apply(self, task: &Task) -> Task {
        Task {
            id: task.id.clone(),
            title: self.title.unwrap_or_else(|| task.title.clone()),
            description: self.description.unwrap_or_else(|| task.description.clone()),
            due: self.due.unwrap_or(task.due),
            priority: self.priority.unwrap_or(task.priority),
            created_at: task.created_at,
        }
    }
}
