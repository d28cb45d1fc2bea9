//! Task definitions — the core data model for scheduled work.

use crate::error::{Result, TaskmillError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default schedule expression (every minute).
pub const DEFAULT_EXPRESSION: &str = "* * * * *";

/// Expression marking a task that survives a scheduler reboot.
pub const REBOOT_EXPRESSION: &str = "@reboot";

/// A schedulable unit of work. The name is the sole identity: two tasks
/// with the same name are the same logical entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique name — the identity key everywhere in the engine.
    pub name: String,
    /// What to do when the task runs.
    pub action: TaskAction,
    /// Schedule expression. Dueness is computed externally from it; the
    /// engine only consumes the resulting boolean fact.
    pub expression: String,
    /// Current lifecycle state.
    pub state: TaskState,
    /// IANA timezone name the schedule is evaluated in.
    pub timezone: String,
    /// Externally computed fact: is the task eligible to run now?
    pub due: bool,
    /// Whether execution must be instrumented by the tracker.
    pub tracked: bool,
    /// Niceness, -20..=19. Lower values run first under the `nice` policy.
    pub nice: i8,
    /// When the task was handed to a transport.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// When the task last finished running.
    pub last_execution: Option<DateTime<Utc>>,
    /// Wall-clock duration of the last tracked run.
    pub execution_computation_time: Option<Duration>,
    /// Process memory usage recorded after the last tracked run, in bytes.
    pub execution_memory_usage: Option<u64>,
}

/// What the task does when it runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TaskAction {
    /// Does nothing — placeholder and test vehicle.
    Null,
    /// Run a command, argv-style.
    Shell { command: Vec<String> },
    /// Fire an HTTP request.
    Http { url: String, method: String },
}

/// Task lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TaskState {
    /// Scheduled and eligible for the next execution pass.
    ReadyToExecute,
    /// Currently inside an execution unit.
    Running,
    /// Suspended by the caller; skipped by the worker until resumed.
    Paused,
    /// Last run completed without fault.
    Done,
    /// Last run faulted; carries the fault message.
    Failed(String),
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskState::ReadyToExecute => write!(f, "ready_to_execute"),
            TaskState::Running => write!(f, "running"),
            TaskState::Paused => write!(f, "paused"),
            TaskState::Done => write!(f, "done"),
            TaskState::Failed(_) => write!(f, "failed"),
        }
    }
}

impl Task {
    /// Create a task with default scheduling metadata.
    pub fn new(name: &str, action: TaskAction) -> Self {
        Self {
            name: name.to_string(),
            action,
            expression: DEFAULT_EXPRESSION.to_string(),
            state: TaskState::ReadyToExecute,
            timezone: "UTC".to_string(),
            due: false,
            tracked: true,
            nice: 0,
            scheduled_at: None,
            last_execution: None,
            execution_computation_time: None,
            execution_memory_usage: None,
        }
    }

    /// Create a no-op task.
    pub fn null(name: &str) -> Self {
        Self::new(name, TaskAction::Null)
    }

    /// Create a shell task from an argv vector.
    pub fn shell(name: &str, command: Vec<String>) -> Self {
        Self::new(name, TaskAction::Shell { command })
    }

    /// Create an HTTP task.
    pub fn http(name: &str, url: &str, method: &str) -> Self {
        Self::new(
            name,
            TaskAction::Http {
                url: url.to_string(),
                method: method.to_string(),
            },
        )
    }

    /// Whether the task is eligible to run now. The fact itself is computed
    /// upstream from the expression and timezone.
    pub fn is_due(&self) -> bool {
        self.due
    }

    /// Whether the task survives [`reboot`](crate::task::REBOOT_EXPRESSION)
    /// handling in the scheduler.
    pub fn runs_on_reboot(&self) -> bool {
        self.expression == REBOOT_EXPRESSION
    }

    /// Check the structural invariants a task must satisfy before it may
    /// enter a [`TaskList`](crate::list::TaskList).
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(TaskmillError::InvalidArgument(
                "A task cannot have an empty name".into(),
            ));
        }
        if !(-20..=19).contains(&self.nice) {
            return Err(TaskmillError::InvalidArgument(format!(
                "The nice value \"{}\" is out of range, expected -20..=19",
                self.nice
            )));
        }
        Ok(())
    }
}
