//! Policy orchestrator — selects an ordering strategy by name.

use crate::SchedulePolicy;
use crate::strategies::{
    ExecutionDurationPolicy, FirstInFirstOutPolicy, FirstInLastOutPolicy, MemoryUsagePolicy,
    NicePolicy,
};
use taskmill_core::{Result, Task, TaskmillError};

/// Holds an ordered set of policies and applies the first one supporting a
/// requested discriminator.
pub struct PolicyOrchestrator {
    policies: Vec<Box<dyn SchedulePolicy>>,
}

impl PolicyOrchestrator {
    pub fn new(policies: Vec<Box<dyn SchedulePolicy>>) -> Self {
        Self { policies }
    }

    /// Orchestrator pre-loaded with every policy this crate ships.
    pub fn with_defaults() -> Self {
        Self::new(vec![
            Box::new(FirstInFirstOutPolicy),
            Box::new(FirstInLastOutPolicy),
            Box::new(NicePolicy),
            Box::new(MemoryUsagePolicy),
            Box::new(ExecutionDurationPolicy),
        ])
    }

    /// Sort tasks with the first registered policy answering to `policy`.
    /// Unsupported names are a configuration error.
    pub fn sort(&self, policy: &str, tasks: Vec<Task>) -> Result<Vec<Task>> {
        for candidate in &self.policies {
            if !candidate.support(policy) {
                continue;
            }
            tracing::debug!("sorting {} tasks with the \"{policy}\" policy", tasks.len());
            return Ok(candidate.sort(tasks));
        }

        Err(TaskmillError::InvalidArgument(format!(
            "The policy \"{policy}\" cannot be used as no schedule policy supports it"
        )))
    }
}

impl Default for PolicyOrchestrator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
