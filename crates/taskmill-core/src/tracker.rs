//! Execution tracking — per-task timing and memory instrumentation,
//! gated by the task's `tracked` flag.

use crate::task::Task;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Named timers. Stopping a timer that was never started is a no-op, which
/// guards against tracking being toggled off between start and end.
#[derive(Debug, Default)]
pub struct Stopwatch {
    timers: Mutex<HashMap<String, Instant>>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a named timer.
    pub fn start(&self, name: &str) {
        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        timers.insert(name.to_string(), Instant::now());
    }

    /// Whether a timer with this name is currently running.
    pub fn is_started(&self, name: &str) -> bool {
        let timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        timers.contains_key(name)
    }

    /// Stop a named timer, returning the elapsed duration. `None` if the
    /// timer was never started.
    pub fn stop(&self, name: &str) -> Option<Duration> {
        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        timers.remove(name).map(|started| started.elapsed())
    }
}

/// Resident memory of the current process, in bytes. Parses VmRSS out of
/// /proc/self/status; other platforms report 0.
pub fn current_memory_usage() -> u64 {
    #[cfg(target_os = "linux")]
    {
        memory_usage_linux().unwrap_or(0)
    }
    #[cfg(not(target_os = "linux"))]
    {
        0
    }
}

#[cfg(target_os = "linux")]
fn memory_usage_linux() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            let kb: u64 = rest.trim().trim_end_matches("kB").trim().parse().ok()?;
            return Some(kb * 1024);
        }
    }
    None
}

/// Wraps a task's execution with timing and memory instrumentation. Holds no
/// per-task state beyond the stopwatch; side effects are confined to the two
/// execution-metric fields on the task.
#[derive(Debug, Default)]
pub struct TaskExecutionTracker {
    watch: Stopwatch,
}

impl TaskExecutionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn timer_key(task: &Task) -> String {
        // Task names are unique per list, so the key is unique per
        // concurrently-running task.
        format!("task_execution.{}", task.name)
    }

    /// Start timing the task. No-op for untracked tasks.
    pub fn start_tracking(&self, task: &Task) {
        if !task.tracked {
            return;
        }
        self.watch.start(&Self::timer_key(task));
    }

    /// Record memory usage and, if a matching timer was started, the elapsed
    /// duration onto the task. No-op for untracked tasks.
    pub fn end_tracking(&self, task: &mut Task) {
        if !task.tracked {
            return;
        }

        task.execution_memory_usage = Some(current_memory_usage());

        if let Some(elapsed) = self.watch.stop(&Self::timer_key(task)) {
            task.execution_computation_time = Some(elapsed);
        }
    }
}
