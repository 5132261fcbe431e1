// src/exec/executor_loop.rs

//! Main executor loop that spawns task runs.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::dag::ScheduledTask;
use crate::engine::{RuntimeEvent, TaskName};
use crate::exec::task_runner::run_task;
use crate::pipeline::Pipeline;

/// Spawn the background executor loop.
///
/// Each scheduled task runs in its own Tokio task. Runs of the same task are
/// not serialised: an overlapping watch invocation starts even while the
/// previous one is still writing.
pub fn spawn_executor(
    pipeline: Arc<Pipeline>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> mpsc::Sender<ScheduledTask> {
    let (tx, mut rx) = mpsc::channel::<ScheduledTask>(32);

    tokio::spawn(async move {
        info!("executor loop started");

        let mut active: HashMap<TaskName, Vec<tokio::task::JoinHandle<()>>> = HashMap::new();

        while let Some(task) = rx.recv().await {
            let handles = active.entry(task.name.clone()).or_default();
            handles.retain(|h| !h.is_finished());
            if !handles.is_empty() {
                debug!(
                    task = %task.name,
                    run_id = task.run_id,
                    in_flight = handles.len(),
                    "task already running; starting overlapping invocation"
                );
            }

            let pipeline = Arc::clone(&pipeline);
            let rt_tx = runtime_tx.clone();
            handles.push(tokio::spawn(async move {
                run_task(pipeline, task, rt_tx).await;
            }));
        }

        info!("executor loop finished (channel closed)");
    });

    tx
}
