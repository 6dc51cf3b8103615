//! dueq: a personal task list executed strictly one task at a time.
//!
//! Tasks are ordered earliest deadline first, then by priority. The
//! [`sched`] module holds the ordering index, the execution queue and the
//! scheduler that keeps them in step with the task set; the other modules
//! load and save boards and drive the `dq` command line.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod sched;
pub mod util;
