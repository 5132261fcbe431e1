// src/dag/task_info.rs

//! Per-task bookkeeping and dispatch records.

use crate::engine::TaskName;
use crate::pipeline::TaskKind;

/// Where a task stands in the active run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskRunState {
    /// Not pulled into the active run (or no run has started).
    #[default]
    NotInRun,
    /// In the run, waiting for predecessors.
    Pending,
    /// Handed to the executor.
    Running,
    DoneSuccess,
    /// Failed itself, or was failed because a predecessor did.
    DoneFailed,
}

impl TaskRunState {
    pub fn in_flight(self) -> bool {
        matches!(self, TaskRunState::Pending | TaskRunState::Running)
    }
}

/// State the scheduler keeps for one plan step. History survives across
/// runs; `state` is reset when a new run starts.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TaskSlot {
    pub(crate) state: TaskRunState,
    pub(crate) last_success: Option<u64>,
    pub(crate) last_failure: Option<u64>,
}

impl TaskSlot {
    /// Whether this step has ever finished, successfully or not.
    pub(crate) fn has_history(&self) -> bool {
        self.last_success.is_some() || self.last_failure.is_some()
    }
}

/// A task invocation the executor should start now.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    pub name: TaskName,
    pub kind: TaskKind,
    /// Run this invocation belongs to.
    pub run_id: u64,
    /// Tracked invocations report back into the run state machine.
    /// Overlapping watch invocations are untracked: their completion is
    /// logged and summarised but changes no run state.
    pub tracked: bool,
}

impl ScheduledTask {
    pub fn tracked(kind: TaskKind, run_id: u64) -> Self {
        Self {
            name: kind.name().to_string(),
            kind,
            run_id,
            tracked: true,
        }
    }

    pub fn untracked(kind: TaskKind, run_id: u64) -> Self {
        Self {
            tracked: false,
            ..Self::tracked(kind, run_id)
        }
    }
}
