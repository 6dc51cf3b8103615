pub mod calendar;
pub mod task_ops;
