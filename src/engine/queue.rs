// src/engine/queue.rs

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, warn};

use crate::engine::TaskName;
use crate::types::TriggerWhileRunningBehaviour;

/// Queue of triggers that arrive while a run is already executing.
///
/// Each queued entry is a *batch* of task names that seeds one future run.
/// `max_runs` (the `queue_length` setting) bounds how many follow-up runs may
/// wait at once:
/// - a trigger joins the newest batch unless that batch already holds the
///   task, in which case it opens a new batch;
/// - once `max_runs` batches are waiting, a repeat trigger is dropped since
///   the task is already going to run again;
/// - `drain_pending()` hands out one batch at a time, so queued runs happen
///   one after another.
///
/// Under `Overlap` nothing is ever queued; the core dispatches the extra
/// invocation directly.
#[derive(Debug)]
pub struct TriggerQueue {
    behaviour: TriggerWhileRunningBehaviour,
    max_runs: usize,
    runs: VecDeque<BTreeSet<TaskName>>,
}

impl TriggerQueue {
    /// `max_runs` is clamped to at least 1.
    pub fn new(behaviour: TriggerWhileRunningBehaviour, max_runs: usize) -> Self {
        let max_runs = max_runs.max(1);
        Self {
            behaviour,
            max_runs,
            runs: VecDeque::new(),
        }
    }

    /// Returns true if there are no queued triggers.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Number of follow-up runs waiting.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn behaviour(&self) -> TriggerWhileRunningBehaviour {
        self.behaviour
    }

    /// Record that a task was triggered while a run is in progress.
    ///
    /// `Cancel` throws away every queued batch and keeps only this task.
    pub fn record_trigger(&mut self, task: &str) {
        let name = task.to_string();

        match self.behaviour {
            TriggerWhileRunningBehaviour::Queue => {
                let queued = self.runs.len();
                match self.runs.back_mut() {
                    Some(last) if !last.contains(&name) => {
                        last.insert(name.clone());
                        debug!(task = %name, batches = self.runs.len(), "merged trigger into newest queued batch");
                    }
                    Some(_) if queued >= self.max_runs => {
                        warn!(
                            task = %name,
                            max_runs = self.max_runs,
                            "queue_length reached; task is already queued, dropping trigger"
                        );
                    }
                    _ => {
                        self.runs.push_back(BTreeSet::from([name.clone()]));
                        debug!(task = %name, batches = self.runs.len(), "queued a new follow-up run");
                    }
                }
            }
            TriggerWhileRunningBehaviour::Cancel => {
                debug!(task = %name, dropped = self.runs.len(), "replacing queued runs with latest trigger");
                self.runs.clear();
                self.runs.push_back(BTreeSet::from([name]));
            }
            TriggerWhileRunningBehaviour::Overlap => {
                debug!(task = %name, "overlap mode never queues triggers");
            }
        }
    }

    /// Take the oldest queued batch as a sorted list of task names; empty
    /// when nothing is queued.
    pub fn drain_pending(&mut self) -> Vec<TaskName> {
        let tasks: Vec<TaskName> = self
            .runs
            .pop_front()
            .map(|batch| batch.into_iter().collect())
            .unwrap_or_default();
        debug!(
            drained = tasks.len(),
            remaining = self.runs.len(),
            "took queued batch for new run"
        );
        tasks
    }
}
