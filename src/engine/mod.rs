// src/engine/mod.rs

//! Orchestration engine for assetflow.
//!
//! This module ties together:
//! - the plan scheduler
//! - the trigger queue (what happens when triggers arrive while a run is active)
//! - the main runtime event loop that reacts to:
//!   - file-watch triggers
//!   - output-tree changes (browser reloads)
//!   - task completion events
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// Outcome of a task run for the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed(String),
}

/// Why a task was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// Manual trigger (e.g. plan roots at startup).
    Manual,
    /// Triggered due to a filesystem event.
    FileWatch,
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// If true, exit the runtime once the plan is idle and there are no
    /// queued triggers (one-shot builds).
    pub exit_when_idle: bool,
}

/// Events flowing into the runtime from watchers, executors, etc.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A task should be (logically) triggered.
    TaskTriggered {
        task: TaskName,
        reason: TriggerReason,
    },
    /// A task run finished with a concrete outcome.
    TaskCompleted {
        task: TaskName,
        outcome: TaskOutcome,
        /// Mirrors [`crate::dag::ScheduledTask::tracked`].
        tracked: bool,
    },
    /// A file in the output tree changed; connected browsers should reload.
    OutputChanged { path: String },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// What happened to the tasks seen by a runtime, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: Vec<TaskName>,
    /// Tasks that failed, plus dependents that were failed without running.
    pub failed: Vec<TaskName>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub mod core;
pub mod event_handlers;
pub mod queue;
pub mod runtime;

pub use crate::types::TriggerWhileRunningBehaviour;
pub use core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use queue::TriggerQueue;
pub use runtime::Runtime;
