use std::fmt::Write;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::Serialize;

use crate::model::config::DisplayConfig;
use crate::model::task::Task;
use crate::ops::calendar::CalendarDay;
use crate::util::unicode::{display_width, fit_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due: Option<String>,
    pub priority: i32,
    pub priority_label: &'static str,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct QueuedTaskJson {
    pub position: usize,
    #[serde(flatten)]
    pub task: TaskJson,
}

#[derive(Serialize)]
pub struct CalendarDayJson {
    pub date: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct ConfigValueJson<'a> {
    pub key: &'a str,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        due: task.due.map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true)),
        priority: task.priority.0,
        priority_label: task.priority.label(),
        created_at: task.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

/// Execution order with 1-based positions
pub fn queue_to_json<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<QueuedTaskJson> {
    tasks
        .into_iter()
        .enumerate()
        .map(|(i, task)| QueuedTaskJson {
            position: i + 1,
            task: task_to_json(task),
        })
        .collect()
}

pub fn calendar_to_json(days: &[CalendarDay<'_>]) -> Vec<CalendarDayJson> {
    days.iter()
        .map(|day| CalendarDayJson {
            date: day.date.format("%Y-%m-%d").to_string(),
            tasks: day.tasks.iter().map(|t| task_to_json(t)).collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a due date with a user-supplied strftime string, falling back to
/// ISO dates if the format can't be rendered.
pub fn format_due(due: DateTime<Utc>, date_format: &str) -> String {
    let local = due.with_timezone(&Local);
    let mut out = String::new();
    if write!(out, "{}", local.format(date_format)).is_err() {
        out.clear();
        out.push_str(&local.format("%Y-%m-%d").to_string());
    }
    out
}

fn due_or_none(task: &Task, date_format: &str) -> String {
    task.due
        .map(|d| format_due(d, date_format))
        .unwrap_or_else(|| "no deadline".to_string())
}

/// One line per task in execution order:
/// `  1. T-003  Title…  2025-01-01  P1 High`
pub fn format_queue_listing<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    display: &DisplayConfig,
) -> Vec<String> {
    let tasks: Vec<&Task> = tasks.into_iter().collect();
    if tasks.is_empty() {
        return vec!["No tasks scheduled.".to_string()];
    }
    let dues: Vec<String> = tasks
        .iter()
        .map(|t| due_or_none(t, &display.date_format))
        .collect();
    let id_width = tasks.iter().map(|t| display_width(&t.id)).max().unwrap_or(0);
    let due_width = dues.iter().map(|d| display_width(d)).max().unwrap_or(0);
    let pos_width = tasks.len().to_string().len();

    tasks
        .iter()
        .zip(&dues)
        .enumerate()
        .map(|(i, (task, due))| {
            format!(
                "{:>pw$}. {}  {}  {}  {} {}",
                i + 1,
                fit_to_width(&task.id, id_width),
                fit_to_width(&task.title, display.title_width),
                fit_to_width(due, due_width),
                task.priority,
                task.priority.label(),
                pw = pos_width,
            )
        })
        .collect()
}

/// Detailed task view
pub fn format_task_detail(task: &Task, display: &DisplayConfig) -> Vec<String> {
    let mut lines = vec![format!("{}  {}", task.id, task.title)];
    lines.push(format!("due: {}", due_or_none(task, &display.date_format)));
    lines.push(format!(
        "priority: {} ({})",
        task.priority,
        task.priority.label()
    ));
    lines.push(format!(
        "created: {}",
        task.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    if let Some(desc) = &task.description {
        lines.push("description:".to_string());
        for line in desc.lines() {
            lines.push(format!("  {}", line));
        }
    }
    lines
}

/// Calendar listing: a heading per day, tasks below it
pub fn format_calendar(days: &[CalendarDay<'_>]) -> Vec<String> {
    if days.is_empty() {
        return vec!["No tasks with deadlines.".to_string()];
    }
    let mut lines = Vec::new();
    for (i, day) in days.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("== {} ==", day.date.format("%a, %b %-d %Y")));
        for task in &day.tasks {
            lines.push(format!("  [{}] {} {}", task.priority, task.id, task.title));
        }
    }
    lines
}
