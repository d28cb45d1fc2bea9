//! Failover transport — aggregates child transports under one redundancy
//! policy. Client-side only: no leader election, no quorum.

use crate::Transport;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use taskmill_core::{Result, Task, TaskList, TaskmillError};

/// Ordered fallthrough: children are tried in declared order.
pub const MODE_NORMAL: &str = "normal";

/// Load distribution: the starting child rotates per operation, then the
/// same fallthrough applies.
pub const MODE_ROUND_ROBIN: &str = "round_robin";

/// Transport delegating every operation to an ordered, non-empty set of
/// exclusively-owned children.
pub struct FailoverTransport {
    children: Vec<Box<dyn Transport>>,
    mode: String,
    cursor: AtomicUsize,
}

impl FailoverTransport {
    /// Build from at least one child transport. Zero children is a
    /// configuration error, not a panic.
    pub fn new(children: Vec<Box<dyn Transport>>, mode: &str) -> Result<Self> {
        if children.is_empty() {
            return Err(TaskmillError::Configuration(
                "A failover transport requires at least one nested transport".into(),
            ));
        }
        Ok(Self {
            children,
            mode: mode.to_string(),
            cursor: AtomicUsize::new(0),
        })
    }

    /// Number of child transports.
    pub fn children_count(&self) -> usize {
        self.children.len()
    }

    /// The resolved failover mode.
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Run an operation against the children. The first child completing
    /// without fault supplies the result; a faulting child is logged and the
    /// next one is tried. All children faulting surfaces an aggregate error
    /// carrying the last underlying fault.
    async fn execute<'a, T>(
        &'a self,
        operation: impl Fn(&'a dyn Transport) -> BoxFuture<'a, Result<T>>,
    ) -> Result<T> {
        let count = self.children.len();
        let start = if self.mode == MODE_ROUND_ROBIN {
            self.cursor.fetch_add(1, Ordering::Relaxed) % count
        } else {
            0
        };

        let mut last_error = None;
        for offset in 0..count {
            let index = (start + offset) % count;
            match operation(self.children[index].as_ref()).await {
                Ok(value) => {
                    if offset > 0 {
                        tracing::info!("🔄 failover succeeded on transport #{index}");
                    }
                    return Ok(value);
                }
                Err(err) => {
                    tracing::warn!("⚠️ transport #{index} failed: {err}");
                    last_error = Some(err);
                }
            }
        }

        Err(TaskmillError::Transport(format!(
            "All the nested transports failed to execute the operation, last error: {}",
            last_error.map(|e| e.to_string()).unwrap_or_default()
        )))
    }
}

#[async_trait]
impl Transport for FailoverTransport {
    async fn create(&self, task: Task) -> Result<()> {
        self.execute(|t| t.create(task.clone())).await
    }

    async fn get(&self, name: &str) -> Result<Task> {
        self.execute(|t| t.get(name)).await
    }

    async fn update(&self, name: &str, task: Task) -> Result<()> {
        self.execute(|t| t.update(name, task.clone())).await
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.execute(|t| t.delete(name)).await
    }

    async fn list(&self) -> Result<TaskList> {
        self.execute(|t| t.list()).await
    }

    async fn clear(&self) -> Result<()> {
        self.execute(|t| t.clear()).await
    }

    fn options(&self) -> HashMap<String, String> {
        HashMap::from([("mode".to_string(), self.mode.clone())])
    }
}
