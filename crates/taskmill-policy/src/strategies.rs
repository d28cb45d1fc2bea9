//! The shipped ordering strategies.
//!
//! Every sort is a pure permutation of its input and uses a stable sort, so
//! ties always preserve the original relative order.

use crate::SchedulePolicy;
use std::time::Duration;
use taskmill_core::Task;

/// Stable insertion order — the identity ordering.
#[derive(Debug, Default)]
pub struct FirstInFirstOutPolicy;

impl SchedulePolicy for FirstInFirstOutPolicy {
    fn sort(&self, tasks: Vec<Task>) -> Vec<Task> {
        tasks
    }

    fn support(&self, policy: &str) -> bool {
        policy == "first_in_first_out"
    }
}

/// Reverse insertion order.
#[derive(Debug, Default)]
pub struct FirstInLastOutPolicy;

impl SchedulePolicy for FirstInLastOutPolicy {
    fn sort(&self, mut tasks: Vec<Task>) -> Vec<Task> {
        tasks.reverse();
        tasks
    }

    fn support(&self, policy: &str) -> bool {
        policy == "first_in_last_out"
    }
}

/// Ascending niceness: lower nice values run first.
#[derive(Debug, Default)]
pub struct NicePolicy;

impl SchedulePolicy for NicePolicy {
    fn sort(&self, mut tasks: Vec<Task>) -> Vec<Task> {
        tasks.sort_by_key(|task| task.nice);
        tasks
    }

    fn support(&self, policy: &str) -> bool {
        policy == "nice"
    }
}

/// Ascending recorded memory usage; tasks without a recorded run sort first.
#[derive(Debug, Default)]
pub struct MemoryUsagePolicy;

impl SchedulePolicy for MemoryUsagePolicy {
    fn sort(&self, mut tasks: Vec<Task>) -> Vec<Task> {
        tasks.sort_by_key(|task| task.execution_memory_usage.unwrap_or(0));
        tasks
    }

    fn support(&self, policy: &str) -> bool {
        policy == "memory_usage"
    }
}

/// Ascending recorded computation time; tasks without a recorded run sort
/// first.
#[derive(Debug, Default)]
pub struct ExecutionDurationPolicy;

impl SchedulePolicy for ExecutionDurationPolicy {
    fn sort(&self, mut tasks: Vec<Task>) -> Vec<Task> {
        tasks.sort_by_key(|task| task.execution_computation_time.unwrap_or(Duration::ZERO));
        tasks
    }

    fn support(&self, policy: &str) -> bool {
        policy == "execution_duration"
    }
}
