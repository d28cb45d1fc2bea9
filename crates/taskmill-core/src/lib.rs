//! # Taskmill Core
//!
//! The task data model and its immediate services: the ordered name-keyed
//! [`TaskList`], the type-resolving [`TaskBuilder`], and the
//! [`TaskExecutionTracker`] that instruments runs with timing and memory
//! cost. Policies, transports, and the execution runtime live in the
//! sibling crates.

pub mod builder;
pub mod error;
pub mod list;
pub mod task;
pub mod tracker;

pub use builder::{BuilderStrategy, HttpBuilder, NullBuilder, ShellBuilder, TaskBuilder, TaskOptions};
pub use error::{Result, TaskmillError};
pub use list::TaskList;
pub use task::{Task, TaskAction, TaskState};
pub use tracker::{Stopwatch, TaskExecutionTracker, current_memory_usage};
