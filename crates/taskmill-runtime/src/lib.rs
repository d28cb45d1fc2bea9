//! # Taskmill Runtime
//!
//! The execution side of the engine: the [`FiberRunner`] that runs each
//! operation in an isolated, fault-contained unit, the [`Worker`] that
//! drives one task through a tracked run, and the [`Scheduler`] facade
//! wiring tasks, policies, and transports together.
//!
//! ```text
//! Scheduler
//!   ├── schedule(task) ──────────────→ Transport (memory / fs / failover)
//!   ├── due_tasks() ← policy-ordered ─┘
//!   └── Worker.execute(task)
//!         ├── tracker.start_tracking
//!         ├── FiberRunner.run(action)   ← isolated unit, faults contained
//!         └── tracker.end_tracking → timing + memory onto the task
//! ```

pub mod fiber;
pub mod scheduler;
pub mod worker;

pub use fiber::FiberRunner;
pub use scheduler::Scheduler;
pub use worker::Worker;
