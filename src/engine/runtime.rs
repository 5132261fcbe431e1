// src/engine/runtime.rs

use std::fmt;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use crate::dag::ScheduledTask;
use crate::errors::Result;
use crate::exec::ExecutorBackend;
use crate::server::ReloadEvent;

use super::core::CoreRuntime;
use super::{CoreCommand, RunSummary, RuntimeEvent};

/// Async shell around [`CoreRuntime`]: pulls events off the channel, feeds
/// the core, and carries out its commands.
pub struct Runtime<E: ExecutorBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
    reload_tx: Option<broadcast::Sender<ReloadEvent>>,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(core: CoreRuntime, event_rx: mpsc::Receiver<RuntimeEvent>, executor: E) -> Self {
        Self {
            core,
            event_rx,
            executor,
            reload_tx: None,
        }
    }

    /// Forward reload notifications to live-server clients.
    pub fn with_reload(mut self, reload_tx: broadcast::Sender<ReloadEvent>) -> Self {
        self.reload_tx = Some(reload_tx);
        self
    }

    /// Process events until the core asks to stop or every sender is gone.
    /// Returns the outcome of every completion the runtime saw.
    pub async fn run(mut self) -> Result<RunSummary> {
        info!("runtime started");
        while let Some(event) = self.event_rx.recv().await {
            debug!(?event, "runtime event");
            let step = self.core.step(event);
            for command in step.commands {
                self.execute_command(command).await?;
            }
            if !step.keep_running {
                info!("core requested exit");
                return Ok(self.core.into_summary());
            }
        }
        info!("runtime event channel closed");
        Ok(self.core.into_summary())
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::DispatchTasks(tasks) => {
                self.spawn_ready(tasks).await?;
            }
            CoreCommand::NotifyReload(path) => self.notify_reload(path),
            CoreCommand::RequestExit => debug!("exit requested; draining this step"),
        }
        Ok(())
    }

    fn notify_reload(&self, path: String) {
        let Some(tx) = &self.reload_tx else {
            debug!(path = %path, "output changed; no live server attached");
            return;
        };
        // Sending only fails when no browser is connected.
        match tx.send(ReloadEvent { path: path.clone() }) {
            Ok(receivers) => info!(path = %path, receivers, "reloading browsers"),
            Err(_) => debug!(path = %path, "output changed; no browsers connected"),
        }
    }

    async fn spawn_ready(&mut self, tasks: Vec<ScheduledTask>) -> Result<()> {
        if tasks.is_empty() {
            return Ok(());
        }

        let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        debug!(?names, run_id = tasks[0].run_id, "dispatching");

        self.executor.spawn_ready_tasks(tasks).await
    }
}
