//! Fault-isolated execution units.
//!
//! Each operation runs inside its own execution unit (a blocking task) and
//! hands its result back to the caller over a oneshot channel — from the
//! caller's point of view `run` is synchronous. The unit is a containment
//! boundary: a fault, or even a panic, inside one operation cannot corrupt
//! another's state.

use taskmill_core::{Result, TaskmillError};
use tokio::sync::oneshot;

/// Runs arbitrary operations in isolated execution units. Stateless; one
/// runner can serve any number of operations.
#[derive(Debug, Default)]
pub struct FiberRunner;

impl FiberRunner {
    pub fn new() -> Self {
        Self
    }

    /// Execute `operation` in its own unit and block the calling flow until
    /// the result is available. The produced value is returned unmodified. A
    /// fault is logged at the highest severity, then re-raised unchanged —
    /// never swallowed.
    pub async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let handle = tokio::task::spawn_blocking(move || {
            // Hand the result back, then let the unit terminate. A dropped
            // receiver means the caller went away; nothing left to do.
            let _ = sender.send(operation());
        });

        match receiver.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                tracing::error!("💥 An error occurred while performing the action: {err}");
                Err(err)
            }
            // The sender was dropped without a value: the operation panicked
            // inside its unit. Contain it and surface an execution fault.
            Err(_) => {
                let reason = match handle.await {
                    Err(join_err) if join_err.is_panic() => "the operation panicked".to_string(),
                    Err(join_err) => join_err.to_string(),
                    Ok(()) => "the operation was aborted".to_string(),
                };
                tracing::error!("💥 An error occurred while performing the action: {reason}");
                Err(TaskmillError::Execution(reason))
            }
        }
    }
}
