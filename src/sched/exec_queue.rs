use std::collections::VecDeque;

use crate::model::task::Task;

/// FIFO of tasks in execution order. The front is the only task that may be
/// completed.
#[derive(Debug, Clone, Default)]
pub struct ExecutionQueue {
    items: VecDeque<Task>,
}

impl ExecutionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the back.
    pub fn enqueue(&mut self, task: Task) {
        self.items.push_back(task);
    }

    /// Remove and return the front task, or `None` when empty.
    pub fn dequeue(&mut self) -> Option<Task> {
        self.items.pop_front()
    }

    pub fn peek(&self) -> Option<&Task> {
        self.items.front()
    }

    /// Front-to-back view, without consuming anything.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Task> + '_ {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl Extend<Task> for ExecutionQueue {
    fn extend<I: IntoIterator<Item = Task>>(&mut self, iter: I) {
        for task in iter {
            self.enqueue(task);
        }
    }
}
