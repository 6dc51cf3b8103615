use crate::model::task::{Task, TaskPatch};

use super::exec_queue::ExecutionQueue;
use super::order_index::OrderIndex;

/// Error type for scheduling operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("nothing to complete: the queue is empty")]
    EmptyQueue,
    #[error("complete \"{front_title}\" ({front_id}) first")]
    NotFront {
        requested: String,
        front_id: String,
        front_title: String,
    },
    #[error("task not found: {0}")]
    NotFound(String),
}

/// Owns the task set and the two structures derived from it.
///
/// Every mutation replaces the task set and then rebuilds the index and the
/// queue from scratch, so readers only ever see a consistent pair.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    index: OrderIndex,
    queue: ExecutionQueue,
}

impl Scheduler {
    pub fn new(tasks: Vec<Task>) -> Self {
        let mut scheduler = Scheduler::default();
        scheduler.rebuild_all(tasks);
        scheduler
    }

    /// Replace the task set and rebuild both structures.
    pub fn rebuild_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.index.clear();
        for task in &self.tasks {
            self.index.insert(task.clone());
        }
        log::debug!(
            "index rebuilt: {} tasks, depth {}",
            self.index.len(),
            self.index.depth()
        );

        self.queue.clear();
        self.queue.extend(self.index.iter().cloned());
        log::debug!("queue populated: {} tasks", self.queue.len());
    }

    /// The authoritative task set, in stored order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn index(&self) -> &OrderIndex {
        &self.index
    }

    pub fn queue(&self) -> &ExecutionQueue {
        &self.queue
    }

    /// Execution order, front to back.
    pub fn ordered(&self) -> impl ExactSizeIterator<Item = &Task> + '_ {
        self.queue.iter()
    }

    /// The task that must be completed next.
    pub fn peek_current(&self) -> Result<&Task, ScheduleError> {
        self.queue.peek().ok_or(ScheduleError::EmptyQueue)
    }

    /// Look a task up by id through the index.
    pub fn find(&self, id: &str) -> Option<&Task> {
        self.index.search(id)
    }

    pub fn add(&mut self, task: Task) {
        log::info!("adding {} \"{}\"", task.id, task.title);
        self.tasks.push(task);
        self.rebuild();
    }

    /// Replace a task's record with the patched version.
    pub fn edit(&mut self, id: &str, patch: TaskPatch) -> Result<&Task, ScheduleError> {
        let pos = self.position(id)?;
        let updated = patch.apply(&self.tasks[pos]);
        log::info!("updating {}", id);
        self.tasks[pos] = updated;
        self.rebuild();
        Ok(&self.tasks[pos])
    }

    /// Drop every record carrying `id` and return the first of them.
    pub fn delete(&mut self, id: &str) -> Result<Task, ScheduleError> {
        let pos = self.position(id)?;
        let removed = self.tasks.remove(pos);
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let extra = before - self.tasks.len();
        if extra > 0 {
            log::warn!("deleted {} more records sharing id {}", extra, id);
        }
        log::info!("deleted {}", id);
        self.rebuild();
        Ok(removed)
    }

    /// Complete the front task. Any other id is refused and nothing changes.
    pub fn complete(&mut self, id: &str) -> Result<Task, ScheduleError> {
        let front = self.queue.peek().ok_or(ScheduleError::EmptyQueue)?;
        if front.id != id {
            return Err(ScheduleError::NotFront {
                requested: id.to_string(),
                front_id: front.id.clone(),
                front_title: front.title.clone(),
            });
        }
        let done = self.queue.dequeue().ok_or(ScheduleError::EmptyQueue)?;
        if let Some(pos) = self.tasks.iter().position(|t| t.id == done.id) {
            self.tasks.remove(pos);
        }
        log::info!("completed {} \"{}\"", done.id, done.title);
        self.rebuild();
        Ok(done)
    }

    fn position(&self, id: &str) -> Result<usize, ScheduleError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))
    }
}
