use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use assetflow::dag::ScheduledTask;
use assetflow::engine::{RuntimeEvent, TaskOutcome};
use assetflow::errors::Result;
use assetflow::exec::ExecutorBackend;
use tokio::sync::mpsc;

/// A fake executor that:
/// - records every dispatched task (name, run id, tracked flag)
/// - immediately reports `TaskCompleted` for each one, failing the tasks
///   registered with [`FakeExecutor::failing`]
/// - or, in [`FakeExecutor::manual`] mode, reports nothing so the test can
///   complete tasks itself.
pub struct FakeExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    executed: Arc<Mutex<Vec<ScheduledTask>>>,
    failing: HashSet<String>,
    auto_complete: bool,
}

impl FakeExecutor {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        executed: Arc<Mutex<Vec<ScheduledTask>>>,
    ) -> Self {
        Self {
            runtime_tx,
            executed,
            failing: HashSet::new(),
            auto_complete: true,
        }
    }

    pub fn failing(mut self, task: &str) -> Self {
        self.failing.insert(task.to_string());
        self
    }

    pub fn manual(mut self) -> Self {
        self.auto_complete = false;
        self
    }
}

/// Names of the recorded tasks, in dispatch order.
pub fn executed_names(executed: &Arc<Mutex<Vec<ScheduledTask>>>) -> Vec<String> {
    executed
        .lock()
        .unwrap()
        .iter()
        .map(|t| t.name.clone())
        .collect()
}

impl ExecutorBackend for FakeExecutor {
    fn spawn_ready_tasks(
        &mut self,
        tasks: Vec<ScheduledTask>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let executed = Arc::clone(&self.executed);
        let failing = self.failing.clone();
        let auto_complete = self.auto_complete;

        Box::pin(async move {
            for t in tasks {
                executed.lock().unwrap().push(t.clone());
                if !auto_complete {
                    continue;
                }

                let outcome = if failing.contains(&t.name) {
                    TaskOutcome::Failed(format!("{} failed on purpose", t.name))
                } else {
                    TaskOutcome::Success
                };
                tx.send(RuntimeEvent::TaskCompleted {
                    task: t.name.clone(),
                    outcome,
                    tracked: t.tracked,
                })
                .await
                .map_err(anyhow::Error::from)?;
            }
            Ok(())
        })
    }
}
