//! Deadline ordering and one-at-a-time execution.
//!
//! [`OrderIndex`] sorts the active tasks, [`ExecutionQueue`] exposes them in
//! that order, and [`Scheduler`] keeps both in step with the task set.

pub mod exec_queue;
pub mod order_index;
pub mod scheduler;

pub use exec_queue::ExecutionQueue;
pub use order_index::{Deadline, OrderIndex, compare_tasks, sort_key};
pub use scheduler::{ScheduleError, Scheduler};
