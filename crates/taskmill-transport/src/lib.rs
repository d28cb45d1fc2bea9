//! # Taskmill Transport
//!
//! Connection-string-addressed task stores. A DSN selects a transport kind
//! through a factory-resolution chain; the failover transport aggregates
//! several backends under one redundancy policy so a single failing store
//! stays invisible to the caller.

pub mod dsn;
pub mod factory;
pub mod failover;
pub mod filesystem;
pub mod memory;
pub mod serializer;

pub use dsn::Dsn;
pub use factory::{
    FailoverTransportFactory, FilesystemTransportFactory, InMemoryTransportFactory,
    TransportFactory, TransportOptions, TransportRegistry,
};
pub use failover::{FailoverTransport, MODE_NORMAL, MODE_ROUND_ROBIN};
pub use filesystem::FilesystemTransport;
pub use memory::{DEFAULT_EXECUTION_MODE, InMemoryTransport};
pub use serializer::{JsonTaskSerializer, TaskSerializer};

use async_trait::async_trait;
use std::collections::HashMap;
use taskmill_core::{Result, Task, TaskList};

/// A capability interface over a backend store of tasks. Constructed once by
/// a factory from a DSN plus shared services, then lives for the process
/// lifetime of the scheduler.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Store a new task. Storing an already-known name is a no-op.
    async fn create(&self, task: Task) -> Result<()>;

    /// Fetch a task by name. A missing task is a fault at this level —
    /// under a failover transport it triggers fallthrough.
    async fn get(&self, name: &str) -> Result<Task>;

    /// Replace a stored task.
    async fn update(&self, name: &str, task: Task) -> Result<()>;

    /// Remove a task by name. No-op if absent.
    async fn delete(&self, name: &str) -> Result<()>;

    /// All stored tasks, ordered by the transport's execution mode.
    async fn list(&self) -> Result<TaskList>;

    /// Remove every stored task.
    async fn clear(&self) -> Result<()>;

    /// The resolved configuration of this transport, defaults included.
    fn options(&self) -> HashMap<String, String>;
}
