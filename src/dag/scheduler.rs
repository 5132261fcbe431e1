// src/dag/scheduler.rs

//! Run bookkeeping for a [`Plan`].
//!
//! A run starts with the first trigger while idle. Triggering a task pulls
//! it and everything downstream of it into the run. A pending step is
//! dispatched once every predecessor has succeeded in this run, or, for a
//! predecessor outside the run, in some earlier run. A failure fails every
//! participating step downstream. The run is over when nothing is pending
//! or running.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info, warn};

use crate::dag::plan::Plan;
use crate::dag::scheduler_step::SchedulerStep;
use crate::dag::task_info::{ScheduledTask, TaskRunState, TaskSlot};
use crate::engine::{TaskName, TaskOutcome};
use crate::pipeline::TaskKind;

#[derive(Debug)]
pub struct Scheduler {
    plan: Plan,
    slots: BTreeMap<TaskKind, TaskSlot>,
    runs_started: u64,
    active_run: Option<u64>,
}

impl Scheduler {
    pub fn from_plan(plan: &Plan) -> Self {
        let slots = plan
            .tasks()
            .iter()
            .map(|kind| (*kind, TaskSlot::default()))
            .collect();
        Self {
            plan: plan.clone(),
            slots,
            runs_started: 0,
            active_run: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.active_run.is_none()
    }

    pub fn current_run_id(&self) -> Option<u64> {
        self.active_run
    }

    /// Id of the most recently started run; 0 before the first one.
    pub fn last_run_id(&self) -> u64 {
        self.runs_started
    }

    /// The plan step called `task`, if the plan has one.
    pub fn kind_of(&self, task: &str) -> Option<TaskKind> {
        TaskKind::from_name(task).filter(|kind| self.slots.contains_key(kind))
    }

    /// `None` for tasks outside the plan.
    pub fn run_state_of(&self, task: &str) -> Option<TaskRunState> {
        let kind = self.kind_of(task)?;
        Some(self.slots[&kind].state)
    }

    /// Sorted names of the steps taking part in the active run.
    pub fn tasks_in_current_run(&self) -> Vec<TaskName> {
        if self.is_idle() {
            return Vec::new();
        }
        self.names_where(|slot| slot.state != TaskRunState::NotInRun)
    }

    /// Sorted names of the steps that ended the latest run failed.
    pub fn failed_tasks(&self) -> Vec<TaskName> {
        self.names_where(|slot| slot.state == TaskRunState::DoneFailed)
    }

    /// Whether `task` could be dispatched now; `None` outside the plan.
    pub fn deps_satisfied(&self, task: &str) -> Option<bool> {
        self.kind_of(task).map(|kind| self.predecessors_done(kind))
    }

    /// Open a new run. Per-run state is cleared; success history is kept so
    /// steps outside the new run still count as done.
    pub fn start_new_run(&mut self) {
        self.runs_started += 1;
        self.active_run = Some(self.runs_started);
        for slot in self.slots.values_mut() {
            slot.state = TaskRunState::NotInRun;
        }
        debug!(run_id = self.runs_started, "scheduler: run started");
    }

    pub fn handle_trigger(&mut self, task: &str) -> Vec<ScheduledTask> {
        self.step_trigger(task).newly_scheduled
    }

    pub fn handle_completion(&mut self, task: &str, outcome: TaskOutcome) -> Vec<ScheduledTask> {
        self.step_completion(task, outcome).newly_scheduled
    }

    /// Pull `task` and its downstream steps into the run (opening one if
    /// idle) and dispatch whatever became ready.
    pub fn step_trigger(&mut self, task: &str) -> SchedulerStep {
        if self.is_idle() {
            debug!(task = %task, "trigger while idle; opening a run");
            self.start_new_run();
        }

        match self.kind_of(task) {
            Some(kind) => self.enlist_downstream(kind),
            None => warn!(task = %task, "trigger for task outside the plan; ignoring"),
        }

        SchedulerStep {
            newly_scheduled: self.dispatch_ready(),
            newly_failed: Vec::new(),
            run_just_finished: self.settle(),
        }
    }

    /// Record the outcome of a running step.
    pub fn step_completion(&mut self, task: &str, outcome: TaskOutcome) -> SchedulerStep {
        let Some(run_id) = self.active_run else {
            warn!(task = %task, "completion with no active run; ignoring");
            return SchedulerStep::default();
        };
        let Some(kind) = self.kind_of(task) else {
            warn!(task = %task, "completion for task outside the plan; ignoring");
            return SchedulerStep::default();
        };

        let mut step = SchedulerStep::default();
        let slot = self.slot_mut(kind);
        if slot.state != TaskRunState::Running {
            debug!(task = %task, run_id, state = ?slot.state, "completion for a task that is not running; ignoring");
            return step;
        }

        match outcome {
            TaskOutcome::Success => {
                slot.state = TaskRunState::DoneSuccess;
                slot.last_success = Some(run_id);
                debug!(task = %task, run_id, "task succeeded");
                step.newly_scheduled = self.dispatch_ready();
            }
            TaskOutcome::Failed(reason) => {
                slot.state = TaskRunState::DoneFailed;
                slot.last_failure = Some(run_id);
                warn!(task = %task, run_id, reason = %reason, "task failed; failing downstream steps");
                step.newly_failed.push(kind.name().to_string());
                step.newly_failed.extend(self.fail_downstream(kind));
            }
        }

        step.run_just_finished = self.settle();
        step
    }

    fn slot_mut(&mut self, kind: TaskKind) -> &mut TaskSlot {
        self.slots.entry(kind).or_default()
    }

    fn names_where(&self, keep: impl Fn(&TaskSlot) -> bool) -> Vec<TaskName> {
        let mut names: Vec<TaskName> = self
            .slots
            .iter()
            .filter(|(_, slot)| keep(*slot))
            .map(|(kind, _)| kind.name().to_string())
            .collect();
        names.sort();
        names
    }

    fn enlist_downstream(&mut self, root: TaskKind) {
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        while let Some(kind) = stack.pop() {
            if !seen.insert(kind) {
                continue;
            }
            let slot = self.slot_mut(kind);
            if slot.state == TaskRunState::NotInRun {
                slot.state = TaskRunState::Pending;
                debug!(task = %kind, "pending in this run");
            }
            stack.extend(self.plan.dependents_of(kind));
        }
    }

    fn predecessors_done(&self, kind: TaskKind) -> bool {
        self.plan.dependencies_of(kind).iter().all(|dep| {
            let slot = &self.slots[dep];
            match slot.state {
                TaskRunState::DoneSuccess => true,
                TaskRunState::NotInRun => slot.last_success.is_some(),
                _ => false,
            }
        })
    }

    /// Move every pending step whose predecessors are done to `Running`.
    /// Tasks that become ready together are returned sorted by name.
    fn dispatch_ready(&mut self) -> Vec<ScheduledTask> {
        let run_id = self.active_run.unwrap_or(0);
        let mut ready: Vec<TaskKind> = self
            .slots
            .iter()
            .filter(|(kind, slot)| {
                slot.state == TaskRunState::Pending && self.predecessors_done(**kind)
            })
            .map(|(kind, _)| *kind)
            .collect();
        ready.sort_by_key(|kind| kind.name());

        ready
            .into_iter()
            .map(|kind| {
                let slot = self.slot_mut(kind);
                slot.state = TaskRunState::Running;
                info!(task = %kind, run_id, rerun = slot.has_history(), "dispatching task");
                ScheduledTask::tracked(kind, run_id)
            })
            .collect()
    }

    fn fail_downstream(&mut self, failed: TaskKind) -> Vec<TaskName> {
        let mut stack = self.plan.dependents_of(failed);
        let mut newly_failed = Vec::new();
        while let Some(kind) = stack.pop() {
            let slot = self.slot_mut(kind);
            if slot.state.in_flight() {
                slot.state = TaskRunState::DoneFailed;
                debug!(task = %kind, upstream = %failed, "failed by upstream step");
                newly_failed.push(kind.name().to_string());
                stack.extend(self.plan.dependents_of(kind));
            }
        }
        newly_failed
    }

    /// Close the active run once nothing is pending or running. Returns
    /// whether this call closed it.
    fn settle(&mut self) -> bool {
        let Some(run_id) = self.active_run else {
            return false;
        };
        if self.slots.values().any(|slot| slot.state.in_flight()) {
            return false;
        }
        info!(run_id, "run finished");
        self.active_run = None;
        true
    }
}
