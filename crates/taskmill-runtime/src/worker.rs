//! Worker — drives one task through a tracked, fault-isolated run.

use crate::fiber::FiberRunner;
use chrono::Utc;
use std::time::Duration;
use taskmill_core::{Result, Task, TaskAction, TaskExecutionTracker, TaskState, TaskmillError};

/// Executes tasks: tracker start, isolated run, tracker end, state
/// bookkeeping. Stateless apart from the stopwatch inside the tracker.
#[derive(Debug, Default)]
pub struct Worker {
    tracker: TaskExecutionTracker,
    runner: FiberRunner,
}

impl Worker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the task's action inside an isolated execution unit. The task is
    /// marked `Done` or `Failed` and stamped with its execution metrics
    /// before any fault propagates.
    pub async fn execute(&self, task: &mut Task) -> Result<()> {
        if task.state == TaskState::Paused {
            tracing::debug!("⏸️ skipping paused task \"{}\"", task.name);
            return Ok(());
        }

        tracing::info!("▶️ executing task \"{}\"", task.name);
        task.state = TaskState::Running;
        self.tracker.start_tracking(task);

        let action = task.action.clone();
        let result = self.runner.run(move || run_action(&action)).await;

        self.tracker.end_tracking(task);
        task.last_execution = Some(Utc::now());
        task.state = match &result {
            Ok(()) => TaskState::Done,
            Err(err) => TaskState::Failed(err.to_string()),
        };

        result
    }
}

/// Synchronous action body — runs inside the blocking execution unit.
fn run_action(action: &TaskAction) -> Result<()> {
    match action {
        TaskAction::Null => Ok(()),
        TaskAction::Shell { command } => {
            let program = command.first().ok_or_else(|| {
                TaskmillError::InvalidArgument("A shell task requires a non-empty command".into())
            })?;
            let status = std::process::Command::new(program)
                .args(&command[1..])
                .status()
                .map_err(|err| TaskmillError::Execution(format!("{program}: {err}")))?;
            if !status.success() {
                return Err(TaskmillError::Execution(format!(
                    "command \"{program}\" exited with {status}"
                )));
            }
            Ok(())
        }
        TaskAction::Http { url, method } => {
            let client = reqwest::blocking::Client::new();
            let request = match method.to_uppercase().as_str() {
                "POST" => client.post(url),
                "PUT" => client.put(url),
                "DELETE" => client.delete(url),
                _ => client.get(url),
            };
            let response = request
                .timeout(Duration::from_secs(30))
                .send()
                .map_err(|err| TaskmillError::Execution(err.to_string()))?;
            if !response.status().is_success() {
                return Err(TaskmillError::Execution(format!(
                    "request to {url} returned {}",
                    response.status()
                )));
            }
            Ok(())
        }
    }
}
