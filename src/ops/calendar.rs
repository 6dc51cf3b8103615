use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::task::{Task, due_day};

/// Tasks due on one local calendar day, most urgent first.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub tasks: Vec<&'a Task>,
}

/// Group tasks with a deadline by day, in ascending date order. Within a
/// day tasks are ordered by priority, keeping stored order for ties. Tasks
/// without a deadline are left out.
pub fn calendar(tasks: &[Task]) -> Vec<CalendarDay<'_>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(due) = task.due {
            days.entry(due_day(due)).or_default().push(task);
        }
    }
    days.into_iter()
        .map(|(date, mut tasks)| {
            tasks.sort_by_key(|t| t.priority);
            CalendarDay { date, tasks }
        })
        .collect()
}
