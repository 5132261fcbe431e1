// src/exec/task_runner.rs

//! Individual task runner.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::dag::ScheduledTask;
use crate::engine::{RuntimeEvent, TaskOutcome};
use crate::pipeline::Pipeline;

/// Run one task on the blocking pool and emit exactly one `TaskCompleted`
/// event for it.
pub async fn run_task(
    pipeline: Arc<Pipeline>,
    task: ScheduledTask,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) {
    info!(task = %task.name, run_id = task.run_id, "starting task");
    let started = Instant::now();

    let kind = task.kind;
    let joined = tokio::task::spawn_blocking(move || pipeline.run(kind)).await;

    let outcome = match joined {
        Ok(Ok(report)) => {
            info!(
                task = %task.name,
                run_id = task.run_id,
                written = report.written,
                skipped = report.skipped,
                swallowed = report.swallowed.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "task finished"
            );
            TaskOutcome::Success
        }
        Ok(Err(err)) => {
            error!(
                task = %task.name,
                run_id = task.run_id,
                error = %format!("{err:#}"),
                "task failed"
            );
            TaskOutcome::Failed(format!("{err:#}"))
        }
        Err(join_err) => {
            error!(
                task = %task.name,
                run_id = task.run_id,
                error = %join_err,
                "task panicked"
            );
            TaskOutcome::Failed(format!("task panicked: {join_err}"))
        }
    };

    if let Err(err) = runtime_tx
        .send(RuntimeEvent::TaskCompleted {
            task: task.name.clone(),
            outcome,
            tracked: task.tracked,
        })
        .await
    {
        warn!(task = %task.name, error = %err, "runtime channel closed before completion was reported");
    }
}
