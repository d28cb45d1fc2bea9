//! Error types shared by every Taskmill crate.

use thiserror::Error;

/// Convenience result alias used across the workspace.
pub type Result<T> = std::result::Result<T, TaskmillError>;

/// All the ways a Taskmill operation can fail.
#[derive(Debug, Error)]
pub enum TaskmillError {
    /// A caller handed us something we cannot work with (unsupported DSN
    /// scheme, unknown task type, unknown policy name, bad option value).
    #[error("{0}")]
    InvalidArgument(String),

    /// The resolved configuration itself is unusable (malformed DSN,
    /// failover transport with zero children).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A transport was asked for a task it does not hold.
    #[error("the task \"{0}\" cannot be found")]
    TaskNotFound(String),

    /// A backend store failed. Under a failover transport this is what
    /// triggers fallthrough to the next child.
    #[error("transport error: {0}")]
    Transport(String),

    /// A task's operation failed (or panicked) while running.
    #[error("execution error: {0}")]
    Execution(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TaskmillError {
    /// Fixed message mandated by the transport factory contract.
    pub fn unsupported_dsn() -> Self {
        Self::InvalidArgument("The given dsn cannot be used to create a transport".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_dsn_message_is_fixed() {
        let err = TaskmillError::unsupported_dsn();
        assert_eq!(
            err.to_string(),
            "The given dsn cannot be used to create a transport"
        );
    }

    #[test]
    fn test_task_not_found_names_the_task() {
        let err = TaskmillError::TaskNotFound("foo".into());
        assert!(err.to_string().contains("\"foo\""));
    }
}
