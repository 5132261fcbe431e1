// src/engine/core.rs

//! The synchronous half of the engine.
//!
//! [`CoreRuntime`] folds one [`RuntimeEvent`] at a time into scheduler and
//! queue state and answers with [`CoreCommand`]s for the async shell in
//! [`super::runtime`] to carry out. Nothing here touches channels or the
//! filesystem, so tests drive it by hand.
//!
//! [`CoreCommand`]: super::CoreCommand

use crate::dag::Scheduler;
use crate::engine::event_handlers::{
    CoreStep, handle_output_changed, handle_task_completion, handle_task_trigger,
};
use crate::engine::queue::TriggerQueue;
use crate::engine::{RunSummary, RuntimeEvent, RuntimeOptions};
use crate::types::TriggerWhileRunningBehaviour;

#[derive(Debug)]
pub struct CoreRuntime {
    scheduler: Scheduler,
    queue: TriggerQueue,
    options: RuntimeOptions,
    summary: RunSummary,
}

impl CoreRuntime {
    pub fn new(
        scheduler: Scheduler,
        behaviour: TriggerWhileRunningBehaviour,
        queue_length: usize,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            scheduler,
            queue: TriggerQueue::new(behaviour, queue_length),
            options,
            summary: RunSummary::default(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    /// No trigger is waiting for a future run.
    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn queued_runs(&self) -> usize {
        self.queue.len()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn into_summary(self) -> RunSummary {
        self.summary
    }

    /// Apply `event` and report what the shell should do next.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::TaskTriggered { task, reason } => {
                handle_task_trigger(&mut self.scheduler, &mut self.queue, task, reason)
            }
            RuntimeEvent::TaskCompleted {
                task,
                outcome,
                tracked,
            } => handle_task_completion(
                &mut self.scheduler,
                &mut self.queue,
                &self.options,
                &mut self.summary,
                task,
                outcome,
                tracked,
            ),
            RuntimeEvent::OutputChanged { path } => handle_output_changed(path),
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }
}
