// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::dag::{ScheduledTask, Scheduler, TaskRunState};
use crate::engine::queue::TriggerQueue;
use crate::engine::{RunSummary, RuntimeOptions, TaskName, TaskOutcome, TriggerReason};
use crate::types::TriggerWhileRunningBehaviour;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Send these tasks to the executor.
    DispatchTasks(Vec<ScheduledTask>),
    /// Tell connected browsers to reload; carries the changed output path.
    NotifyReload(String),
    /// Request that the process exits (one-shot builds, once idle).
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn running(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Handle a task trigger event.
///
/// - If the scheduler is idle, we start a new run and seed it with
///   this trigger plus anything that was already queued.
/// - If a run is active:
///   - A task *not* in the current run is merged into it immediately, so
///     unrelated watch triggers run side by side.
///   - A task already in the run follows the configured behaviour:
///     `overlap` dispatches another (untracked) invocation right away,
///     `queue`/`cancel` record it for a future run.
pub fn handle_task_trigger(
    scheduler: &mut Scheduler,
    queue: &mut TriggerQueue,
    task: TaskName,
    reason: TriggerReason,
) -> CoreStep {
    let mut commands = Vec::new();

    let Some(state) = scheduler.run_state_of(&task) else {
        warn!(task = %task, ?reason, "trigger for task outside the active plan; ignoring");
        return CoreStep::running(commands);
    };

    if scheduler.is_idle() {
        let mut triggers: HashSet<TaskName> = queue.drain_pending().into_iter().collect();
        triggers.insert(task);
        let mut triggers: Vec<TaskName> = triggers.into_iter().collect();
        triggers.sort();

        let mut step = start_new_run_from_triggers(scheduler, triggers);
        commands.append(&mut step.commands);
        return CoreStep::running(commands);
    }

    match state {
        TaskRunState::NotInRun => {
            let newly_ready = scheduler.handle_trigger(&task);
            if !newly_ready.is_empty() {
                commands.push(CoreCommand::DispatchTasks(newly_ready));
            }
        }
        TaskRunState::Pending => {
            // It has not started yet, so it will see this change anyway.
            debug!(task = %task, "trigger for pending task folded into current run");
        }
        TaskRunState::Running | TaskRunState::DoneSuccess | TaskRunState::DoneFailed => {
            match queue.behaviour() {
                TriggerWhileRunningBehaviour::Overlap => {
                    if let (Some(kind), Some(run_id)) =
                        (scheduler.kind_of(&task), scheduler.current_run_id())
                    {
                        debug!(task = %task, run_id, ?state, "dispatching overlapping invocation");
                        commands.push(CoreCommand::DispatchTasks(vec![ScheduledTask::untracked(
                            kind, run_id,
                        )]));
                    }
                }
                TriggerWhileRunningBehaviour::Queue | TriggerWhileRunningBehaviour::Cancel => {
                    queue.record_trigger(&task);
                }
            }
        }
    }

    CoreStep::running(commands)
}

/// Handle a task completion event.
pub fn handle_task_completion(
    scheduler: &mut Scheduler,
    queue: &mut TriggerQueue,
    options: &RuntimeOptions,
    summary: &mut RunSummary,
    task: TaskName,
    outcome: TaskOutcome,
    tracked: bool,
) -> CoreStep {
    let mut commands = Vec::new();

    if tracked {
        let step = scheduler.step_completion(&task, outcome.clone());
        match outcome {
            TaskOutcome::Success => summary.succeeded.push(task),
            TaskOutcome::Failed(_) => summary.failed.extend(step.newly_failed),
        }
        if !step.newly_scheduled.is_empty() {
            commands.push(CoreCommand::DispatchTasks(step.newly_scheduled));
        }
    } else {
        match outcome {
            TaskOutcome::Success => {
                info!(task = %task, "overlapping invocation finished");
                summary.succeeded.push(task);
            }
            TaskOutcome::Failed(reason) => {
                warn!(task = %task, reason = %reason, "overlapping invocation failed");
                summary.failed.push(task);
            }
        }
    }

    commands.append(&mut maybe_start_queued_run(scheduler, queue));

    // One-shot builds exit when the plan is idle and nothing is queued.
    let mut keep_running = true;
    if options.exit_when_idle && scheduler.is_idle() && queue.is_empty() {
        keep_running = false;
        commands.push(CoreCommand::RequestExit);
    }

    CoreStep {
        commands,
        keep_running,
    }
}

/// Every output change becomes exactly one reload notification.
pub fn handle_output_changed(path: String) -> CoreStep {
    CoreStep::running(vec![CoreCommand::NotifyReload(path)])
}

/// Seed a new run from root triggers.
pub fn start_new_run_from_triggers(scheduler: &mut Scheduler, triggers: Vec<TaskName>) -> CoreStep {
    let mut commands = Vec::new();

    if triggers.is_empty() {
        return CoreStep::running(commands);
    }

    scheduler.start_new_run();

    let mut all_ready = Vec::new();
    for task in triggers {
        all_ready.extend(scheduler.handle_trigger(&task));
    }

    if !all_ready.is_empty() {
        commands.push(CoreCommand::DispatchTasks(all_ready));
    }

    CoreStep::running(commands)
}

/// If the scheduler is idle and there are queued triggers, start a new run.
fn maybe_start_queued_run(scheduler: &mut Scheduler, queue: &mut TriggerQueue) -> Vec<CoreCommand> {
    if !scheduler.is_idle() {
        return Vec::new();
    }

    let triggers = queue.drain_pending();
    if triggers.is_empty() {
        return Vec::new();
    }

    start_new_run_from_triggers(scheduler, triggers).commands
}
