// src/exec/backend.rs

//! The seam between the runtime and whatever actually runs tasks.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::dag::ScheduledTask;
use crate::engine::RuntimeEvent;
use crate::errors::{Error, Result};
use crate::pipeline::Pipeline;

use super::executor_loop::spawn_executor;

/// Accepts dispatched tasks. Every accepted task must eventually produce one
/// `RuntimeEvent::TaskCompleted` on the runtime channel.
pub trait ExecutorBackend: Send {
    fn spawn_ready_tasks(
        &mut self,
        tasks: Vec<ScheduledTask>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Runs tasks through a [`Pipeline`] on the blocking pool.
pub struct RealExecutorBackend {
    queue: mpsc::Sender<ScheduledTask>,
}

impl RealExecutorBackend {
    /// Starts the executor loop right away; completions go to `runtime_tx`.
    pub fn new(pipeline: Arc<Pipeline>, runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self {
            queue: spawn_executor(pipeline, runtime_tx),
        }
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn spawn_ready_tasks(
        &mut self,
        tasks: Vec<ScheduledTask>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let queue = self.queue.clone();
        Box::pin(async move {
            for task in tasks {
                queue.send(task).await.map_err(Error::from)?;
            }
            Ok(())
        })
    }
}
