//! Filesystem transport — one JSON file per task, marshalled through the
//! injected serializer. Human-readable and restart-safe.

use crate::Transport;
use crate::dsn::Dsn;
use crate::serializer::TaskSerializer;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taskmill_core::{Result, Task, TaskList, TaskmillError};
use taskmill_policy::PolicyOrchestrator;

/// Backend store writing each task to `<path>/<name>.json`.
pub struct FilesystemTransport {
    path: PathBuf,
    execution_mode: String,
    serializer: Arc<dyn TaskSerializer>,
    orchestrator: Arc<PolicyOrchestrator>,
}

impl FilesystemTransport {
    pub fn new(
        path: &Path,
        execution_mode: &str,
        serializer: Arc<dyn TaskSerializer>,
        orchestrator: Arc<PolicyOrchestrator>,
    ) -> Result<Self> {
        std::fs::create_dir_all(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            execution_mode: execution_mode.to_string(),
            serializer,
            orchestrator,
        })
    }

    /// Build from a parsed DSN: `fs://<execution_mode>?path=/some/dir`.
    pub fn from_dsn(
        dsn: &Dsn,
        serializer: Arc<dyn TaskSerializer>,
        orchestrator: Arc<PolicyOrchestrator>,
    ) -> Result<Self> {
        let path = match dsn.option("path") {
            Some(path) => PathBuf::from(path),
            None => Self::default_path(),
        };
        let mode = if dsn.root().is_empty() {
            crate::memory::DEFAULT_EXECUTION_MODE
        } else {
            dsn.root()
        };
        Self::new(&path, mode, serializer, orchestrator)
    }

    /// Default task directory (~/.taskmill/tasks).
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".taskmill").join("tasks")
    }

    fn task_file(&self, name: &str) -> PathBuf {
        self.path.join(format!("{name}.json"))
    }
}

#[async_trait]
impl Transport for FilesystemTransport {
    async fn create(&self, task: Task) -> Result<()> {
        let file = self.task_file(&task.name);
        if file.exists() {
            return Ok(());
        }
        task.validate()?;
        let payload = self.serializer.serialize(&task)?;
        std::fs::write(&file, payload)?;
        tracing::debug!("stored task \"{}\" at {}", task.name, file.display());
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Task> {
        let file = self.task_file(name);
        if !file.exists() {
            return Err(TaskmillError::TaskNotFound(name.to_string()));
        }
        let payload = std::fs::read(&file)?;
        self.serializer.deserialize(&payload)
    }

    async fn update(&self, name: &str, task: Task) -> Result<()> {
        let file = self.task_file(name);
        if !file.exists() {
            return Err(TaskmillError::TaskNotFound(name.to_string()));
        }
        if name != task.name {
            std::fs::remove_file(&file)?;
        }
        let payload = self.serializer.serialize(&task)?;
        std::fs::write(self.task_file(&task.name), payload)?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let file = self.task_file(name);
        if file.exists() {
            std::fs::remove_file(&file)?;
        }
        Ok(())
    }

    async fn list(&self) -> Result<TaskList> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        // Directory order is arbitrary; fix it before the policy runs.
        files.sort();

        let mut tasks = Vec::with_capacity(files.len());
        for file in files {
            let payload = std::fs::read(&file)?;
            tasks.push(self.serializer.deserialize(&payload)?);
        }

        let sorted = self.orchestrator.sort(&self.execution_mode, tasks)?;
        Ok(sorted.into_iter().collect())
    }

    async fn clear(&self) -> Result<()> {
        for entry in std::fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                std::fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    fn options(&self) -> HashMap<String, String> {
        HashMap::from([
            ("path".to_string(), self.path.display().to_string()),
            ("execution_mode".to_string(), self.execution_mode.clone()),
        ])
    }
}
