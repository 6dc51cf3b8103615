use chrono::{DateTime, Utc};

use crate::model::task::{Priority, Task, TaskPatch, parse_due};

/// Error type for task input validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("invalid due date '{0}' (expected YYYY-MM-DD, YYYY-MM-DDTHH:MM, or RFC 3339)")]
    InvalidDue(String),
    #[error("invalid priority '{0}' (expected an integer, 1 = most urgent)")]
    InvalidPriority(String),
    #[error("nothing to change")]
    EmptyEdit,
    #[error("no ids left under prefix '{0}'; change ids.prefix")]
    IdsExhausted(String),
}

/// Fields for a new task as collected from the user
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
}

/// Build a task record with the next free id under `prefix`.
pub fn new_task(
    existing: &[Task],
    prefix: &str,
    fields: NewTask,
    default_priority: Priority,
) -> Result<Task, TaskError> {
    let title = clean_title(&fields.title)?;
    let id = next_id(existing, prefix)?;
    Ok(Task::new(id, title)
        .with_description(clean_description(fields.description))
        .with_due(fields.due)
        .with_priority(fields.priority.unwrap_or(default_priority)))
}

/// Validate and normalize a patch before it reaches the scheduler.
pub fn clean_patch(mut patch: TaskPatch) -> Result<TaskPatch, TaskError> {
    if patch.is_empty() {
        return Err(TaskError::EmptyEdit);
    }
    if let Some(title) = patch.title.take() {
        patch.title = Some(clean_title(&title)?);
    }
    if let Some(desc) = patch.description.take() {
        patch.description = Some(clean_description(desc));
    }
    Ok(patch)
}

fn clean_title(title: &str) -> Result<String, TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    Ok(title.to_string())
}

fn clean_description(desc: Option<String>) -> Option<String> {
    desc.map(|d| d.trim().to_string()).filter(|d| !d.is_empty())
}

/// Next sequential id: `PREFIX-NNN`, one past the highest existing number.
pub fn next_id(tasks: &[Task], prefix: &str) -> Result<String, TaskError> {
    let prefix_dash = format!("{}-", prefix);
    let max = tasks
        .iter()
        .filter_map(|t| t.id.strip_prefix(&prefix_dash))
        .filter_map(|n| n.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    let next = max
        .checked_add(1)
        .ok_or_else(|| TaskError::IdsExhausted(prefix.to_string()))?;
    Ok(format!("{}{:03}", prefix_dash, next))
}

/// Parse a due date given on the command line. Unlike stored data, bad input
/// here is an error.
pub fn parse_due_arg(s: &str) -> Result<DateTime<Utc>, TaskError> {
    parse_due(s).ok_or_else(|| TaskError::InvalidDue(s.to_string()))
}

pub fn parse_priority_arg(s: &str) -> Result<Priority, TaskError> {
    let n = s
        .trim()
        .parse::<i32>()
        .map_err(|_| TaskError::InvalidPriority(s.to_string()))?;
    if n == 0 {
        return Err(TaskError::InvalidPriority(s.to_string()));
    }
    Ok(Priority(n))
}
