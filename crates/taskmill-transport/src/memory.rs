//! In-memory transport — tasks live in process memory, ordered on `list()`
//! by the configured execution mode.

use crate::Transport;
use crate::dsn::Dsn;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use taskmill_core::{Result, Task, TaskList, TaskmillError};
use taskmill_policy::PolicyOrchestrator;
use tokio::sync::RwLock;

/// Default ordering applied by `list()` when no execution mode is configured.
pub const DEFAULT_EXECUTION_MODE: &str = "first_in_first_out";

/// Backend store keeping tasks in a [`TaskList`] behind a lock.
pub struct InMemoryTransport {
    tasks: RwLock<TaskList>,
    execution_mode: String,
    orchestrator: Arc<PolicyOrchestrator>,
}

impl InMemoryTransport {
    pub fn new(execution_mode: &str, orchestrator: Arc<PolicyOrchestrator>) -> Self {
        Self {
            tasks: RwLock::new(TaskList::new()),
            execution_mode: execution_mode.to_string(),
            orchestrator,
        }
    }

    /// Build from a parsed DSN: `memory://<execution_mode>`, with the
    /// `execution_mode` query option as fallback.
    pub fn from_dsn(dsn: &Dsn, orchestrator: Arc<PolicyOrchestrator>) -> Self {
        let mode = if dsn.root().is_empty() {
            dsn.option("execution_mode").unwrap_or(DEFAULT_EXECUTION_MODE)
        } else {
            dsn.root()
        };
        Self::new(mode, orchestrator)
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn create(&self, task: Task) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.has(&task.name) {
            return Ok(());
        }
        tasks.add([task])
    }

    async fn get(&self, name: &str) -> Result<Task> {
        let tasks = self.tasks.read().await;
        tasks
            .get(name)
            .cloned()
            .ok_or_else(|| TaskmillError::TaskNotFound(name.to_string()))
    }

    async fn update(&self, name: &str, task: Task) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        if !tasks.has(name) {
            return Err(TaskmillError::TaskNotFound(name.to_string()));
        }
        task.validate()?;
        if name != task.name {
            tasks.remove(name);
        }
        tasks.set(task);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        tasks.remove(name);
        Ok(())
    }

    async fn list(&self) -> Result<TaskList> {
        let snapshot = {
            let tasks = self.tasks.read().await;
            tasks.to_vec()
        };
        let sorted = self.orchestrator.sort(&self.execution_mode, snapshot)?;
        Ok(sorted.into_iter().collect())
    }

    async fn clear(&self) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        *tasks = TaskList::new();
        Ok(())
    }

    fn options(&self) -> HashMap<String, String> {
        HashMap::from([("execution_mode".to_string(), self.execution_mode.clone())])
    }
}
