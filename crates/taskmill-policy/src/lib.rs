//! # Taskmill Policy
//!
//! Named, stateless task-ordering strategies plus the orchestrator that
//! selects one by its string discriminator. A policy maps an input sequence
//! of tasks to a permutation of it; nothing else.

pub mod orchestrator;
pub mod strategies;

pub use orchestrator::PolicyOrchestrator;
pub use strategies::{
    ExecutionDurationPolicy, FirstInFirstOutPolicy, FirstInLastOutPolicy, MemoryUsagePolicy,
    NicePolicy,
};

use taskmill_core::Task;

/// A named ordering strategy. `sort` must return every input task exactly
/// once; `support` declares which discriminator string(s) the policy
/// answers to.
pub trait SchedulePolicy: Send + Sync {
    fn sort(&self, tasks: Vec<Task>) -> Vec<Task>;

    fn support(&self, policy: &str) -> bool;
}
