//! Scheduler facade — owns a transport and drives the task lifecycle
//! through it.

use chrono::Utc;
use std::sync::Arc;
use taskmill_core::{Result, Task, TaskList, TaskState, TaskmillError};
use taskmill_transport::Transport;

/// The external surface callers schedule through. Holds the configured
/// timezone and the transport tasks live in; the transport insulates it
/// from any single backend failing.
pub struct Scheduler {
    timezone: String,
    transport: Arc<dyn Transport>,
}

impl Scheduler {
    pub fn new(timezone: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            timezone: timezone.to_string(),
            transport,
        }
    }

    /// Scheduler in the default UTC timezone.
    pub fn utc(transport: Arc<dyn Transport>) -> Self {
        Self::new("UTC", transport)
    }

    /// The timezone schedules are evaluated in.
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Hand a task to the transport. Stamps the scheduling time and inherits
    /// the scheduler timezone when the task does not carry its own.
    pub async fn schedule(&self, mut task: Task) -> Result<()> {
        task.validate()?;
        task.scheduled_at = Some(Utc::now());
        if task.timezone.is_empty() {
            task.timezone = self.timezone.clone();
        }
        tracing::info!("📅 task \"{}\" scheduled", task.name);
        self.transport.create(task).await
    }

    /// Every scheduled task, in the transport's execution order.
    pub async fn tasks(&self) -> Result<TaskList> {
        self.transport.list().await
    }

    /// The due subset: tasks whose externally-computed dueness is set and
    /// that are not paused.
    pub async fn due_tasks(&self) -> Result<TaskList> {
        let tasks = self.transport.list().await?;
        Ok(tasks.filter(|task, _| task.is_due() && task.state != TaskState::Paused))
    }

    /// Fetch a single task.
    pub async fn get(&self, name: &str) -> Result<Task> {
        self.transport.get(name).await
    }

    /// Remove a task from the transport.
    pub async fn unschedule(&self, name: &str) -> Result<()> {
        tracing::info!("🗑️ task \"{name}\" unscheduled");
        self.transport.delete(name).await
    }

    /// Suspend a task. Pausing an already-paused task is a fault.
    pub async fn pause(&self, name: &str) -> Result<()> {
        let mut task = self.transport.get(name).await?;
        if task.state == TaskState::Paused {
            return Err(TaskmillError::InvalidArgument(format!(
                "The task \"{name}\" is already paused"
            )));
        }
        task.state = TaskState::Paused;
        self.transport.update(name, task).await
    }

    /// Resume a paused task. Resuming a task that is not paused is a fault.
    pub async fn resume(&self, name: &str) -> Result<()> {
        let mut task = self.transport.get(name).await?;
        if task.state != TaskState::Paused {
            return Err(TaskmillError::InvalidArgument(format!(
                "The task \"{name}\" is not paused"
            )));
        }
        task.state = TaskState::ReadyToExecute;
        self.transport.update(name, task).await
    }

    /// Empty the transport, keeping only tasks scheduled to run on reboot
    /// and re-scheduling those.
    pub async fn reboot(&self) -> Result<()> {
        let tasks = self.transport.list().await?;
        let survivors = tasks.filter(|task, _| task.runs_on_reboot());

        self.transport.clear().await?;
        for task in survivors {
            self.transport.create(task).await?;
        }
        tracing::info!("♻️ scheduler rebooted");
        Ok(())
    }

    /// Push an externally computed dueness fact onto a task.
    pub async fn mark_due(&self, name: &str, due: bool) -> Result<()> {
        let mut task = self.transport.get(name).await?;
        task.due = due;
        self.transport.update(name, task).await
    }

    /// Write back a task mutated by a worker run.
    pub async fn record(&self, task: &Task) -> Result<()> {
        self.transport.update(&task.name, task.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmill_core::task::REBOOT_EXPRESSION;
    use taskmill_policy::PolicyOrchestrator;
    use taskmill_transport::{DEFAULT_EXECUTION_MODE, InMemoryTransport};

    fn scheduler() -> Scheduler {
        Scheduler::utc(Arc::new(InMemoryTransport::new(
            DEFAULT_EXECUTION_MODE,
            Arc::new(PolicyOrchestrator::with_defaults()),
        )))
    }

    #[tokio::test]
    async fn test_schedule_and_list() {
        let scheduler = scheduler();
        scheduler.schedule(Task::null("foo")).await.unwrap();

        let tasks = scheduler.tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks.get("foo").unwrap().scheduled_at.is_some());
    }

    #[tokio::test]
    async fn test_schedule_keeps_custom_timezone() {
        let scheduler = scheduler();
        let mut task = Task::null("foo");
        task.timezone = "Europe/Paris".to_string();
        scheduler.schedule(task).await.unwrap();

        let stored = scheduler.get("foo").await.unwrap();
        assert_eq!(stored.timezone, "Europe/Paris");
    }

    #[tokio::test]
    async fn test_default_timezone_is_utc() {
        assert_eq!(scheduler().timezone(), "UTC");
    }

    #[tokio::test]
    async fn test_fresh_scheduler_has_no_due_tasks() {
        let scheduler = scheduler();
        scheduler.schedule(Task::null("foo")).await.unwrap();
        assert!(scheduler.due_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_due_tasks_exclude_paused() {
        let scheduler = scheduler();
        scheduler.schedule(Task::null("a")).await.unwrap();
        scheduler.schedule(Task::null("b")).await.unwrap();
        scheduler.mark_due("a", true).await.unwrap();
        scheduler.mark_due("b", true).await.unwrap();
        scheduler.pause("b").await.unwrap();

        let due = scheduler.due_tasks().await.unwrap();
        assert_eq!(due.len(), 1);
        assert!(due.has("a"));
    }

    #[tokio::test]
    async fn test_reboot_with_no_reboot_tasks_empties_the_store() {
        let scheduler = scheduler();
        scheduler.schedule(Task::null("bar")).await.unwrap();
        assert_eq!(scheduler.tasks().await.unwrap().len(), 1);

        scheduler.reboot().await.unwrap();
        assert!(scheduler.tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reboot_keeps_reboot_tasks() {
        let scheduler = scheduler();
        let mut reboot_task = Task::null("foo");
        reboot_task.expression = REBOOT_EXPRESSION.to_string();
        scheduler.schedule(reboot_task).await.unwrap();
        scheduler.schedule(Task::null("bar")).await.unwrap();
        assert_eq!(scheduler.tasks().await.unwrap().len(), 2);

        scheduler.reboot().await.unwrap();
        let tasks = scheduler.tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks.has("foo"));
    }

    #[tokio::test]
    async fn test_pause_twice_is_a_fault() {
        let scheduler = scheduler();
        scheduler.schedule(Task::null("foo")).await.unwrap();

        scheduler.pause("foo").await.unwrap();
        assert!(scheduler.pause("foo").await.is_err());

        scheduler.resume("foo").await.unwrap();
        assert!(scheduler.resume("foo").await.is_err());
    }

    #[tokio::test]
    async fn test_unschedule() {
        let scheduler = scheduler();
        scheduler.schedule(Task::null("foo")).await.unwrap();
        scheduler.unschedule("foo").await.unwrap();
        assert!(scheduler.tasks().await.unwrap().is_empty());
    }
}
