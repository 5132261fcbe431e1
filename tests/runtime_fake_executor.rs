// tests/runtime_fake_executor.rs

mod common;
use crate::common::init_tracing;

use std::sync::{Arc, Mutex};

use assetflow::dag::{Plan, Recipe, Scheduler};
use assetflow::engine::{
    CoreCommand, CoreRuntime, RunSummary, Runtime, RuntimeEvent, RuntimeOptions, TaskOutcome,
    TriggerReason,
};
use assetflow::pipeline::TaskKind;
use assetflow::server::reload_channel;
use assetflow::types::{BuildProfile, TriggerWhileRunningBehaviour};
use assetflow_test_utils::fake_executor::{FakeExecutor, executed_names};
use assetflow_test_utils::with_timeout;
use tokio::sync::mpsc;

fn trigger(task: &str) -> RuntimeEvent {
    RuntimeEvent::TaskTriggered {
        task: task.to_string(),
        reason: TriggerReason::Manual,
    }
}

fn watch_trigger(task: &str) -> RuntimeEvent {
    RuntimeEvent::TaskTriggered {
        task: task.to_string(),
        reason: TriggerReason::FileWatch,
    }
}

fn done(task: &str) -> RuntimeEvent {
    RuntimeEvent::TaskCompleted {
        task: task.to_string(),
        outcome: TaskOutcome::Success,
        tracked: true,
    }
}

fn core(plan: &Plan, behaviour: TriggerWhileRunningBehaviour, exit_when_idle: bool) -> CoreRuntime {
    core_with_queue(plan, behaviour, 1, exit_when_idle)
}

fn core_with_queue(
    plan: &Plan,
    behaviour: TriggerWhileRunningBehaviour,
    queue_length: usize,
    exit_when_idle: bool,
) -> CoreRuntime {
    CoreRuntime::new(
        Scheduler::from_plan(plan),
        behaviour,
        queue_length,
        RuntimeOptions { exit_when_idle },
    )
}

fn dispatched(commands: &[CoreCommand]) -> Vec<(String, bool)> {
    commands
        .iter()
        .filter_map(|c| match c {
            CoreCommand::DispatchTasks(tasks) => Some(tasks),
            _ => None,
        })
        .flatten()
        .map(|t| (t.name.clone(), t.tracked))
        .collect()
}

async fn run_with_fake(plan: &Plan, failing: Option<&str>) -> (RunSummary, Vec<String>) {
    let (tx, rx) = mpsc::channel(64);
    let executed = Arc::new(Mutex::new(Vec::new()));
    let mut executor = FakeExecutor::new(tx.clone(), Arc::clone(&executed));
    if let Some(task) = failing {
        executor = executor.failing(task);
    }

    for root in plan.roots() {
        tx.send(trigger(root.name())).await.unwrap();
    }
    let runtime = Runtime::new(
        core(plan, TriggerWhileRunningBehaviour::Overlap, true),
        rx,
        executor,
    );
    let summary = with_timeout(runtime.run()).await.unwrap();
    (summary, executed_names(&executed))
}

#[tokio::test]
async fn series_runs_in_order_and_exits() {
    init_tracing();
    let plan = Plan::from_recipe(
        "prod:build",
        &Recipe::series([
            TaskKind::Clean,
            TaskKind::Html,
            TaskKind::Css(BuildProfile::Prod),
            TaskKind::Js,
        ]),
    )
    .unwrap();

    let (summary, executed) = run_with_fake(&plan, None).await;

    assert_eq!(executed, vec!["clean", "html", "prod:css", "js"]);
    assert_eq!(summary.succeeded, vec!["clean", "html", "prod:css", "js"]);
    assert!(summary.is_success());
}

#[tokio::test]
async fn failing_step_stops_the_series() {
    init_tracing();
    let plan = Plan::from_recipe(
        "prod:build",
        &Recipe::series([
            TaskKind::Clean,
            TaskKind::Html,
            TaskKind::Js,
            TaskKind::Static,
        ]),
    )
    .unwrap();

    let (summary, executed) = run_with_fake(&plan, Some("html")).await;

    assert_eq!(executed, vec!["clean", "html"]);
    assert_eq!(summary.succeeded, vec!["clean"]);
    let mut failed = summary.failed.clone();
    failed.sort();
    assert_eq!(failed, vec!["html", "js", "static"]);
    assert!(!summary.is_success());
}

#[tokio::test]
async fn shutdown_stops_a_watching_runtime() {
    let plan = Plan::flat("watch", &[TaskKind::Html, TaskKind::Js]);
    let (tx, rx) = mpsc::channel(16);
    let executed = Arc::new(Mutex::new(Vec::new()));
    let executor = FakeExecutor::new(tx.clone(), Arc::clone(&executed));

    tx.send(watch_trigger("js")).await.unwrap();
    tx.send(RuntimeEvent::ShutdownRequested).await.unwrap();

    let runtime = Runtime::new(
        core(&plan, TriggerWhileRunningBehaviour::Overlap, false),
        rx,
        executor,
    );
    let summary = with_timeout(runtime.run()).await.unwrap();

    // The completion was still in the channel behind the shutdown.
    assert_eq!(executed_names(&executed), vec!["js"]);
    assert!(summary.succeeded.is_empty());
}

#[tokio::test]
async fn output_change_reaches_reload_subscribers() {
    let plan = Plan::flat("watch", &[TaskKind::Html]);
    let (tx, rx) = mpsc::channel(16);
    let executed = Arc::new(Mutex::new(Vec::new()));
    let executor = FakeExecutor::new(tx.clone(), Arc::clone(&executed));
    let (reload_tx, mut reload_rx) = reload_channel();

    tx.send(RuntimeEvent::OutputChanged {
        path: "dist/index.html".into(),
    })
    .await
    .unwrap();
    tx.send(RuntimeEvent::ShutdownRequested).await.unwrap();

    Runtime::new(
        core(&plan, TriggerWhileRunningBehaviour::Overlap, false),
        rx,
        executor,
    )
    .with_reload(reload_tx)
    .run()
    .await
    .unwrap();

    let event = reload_rx.recv().await.unwrap();
    assert_eq!(event.path, "dist/index.html");
    assert!(executed_names(&executed).is_empty());
}

#[test]
fn overlap_dispatches_untracked_invocation() {
    let plan = Plan::flat("watch", &[TaskKind::Html, TaskKind::Css(BuildProfile::Dev)]);
    let mut core = core(&plan, TriggerWhileRunningBehaviour::Overlap, false);

    let step = core.step(watch_trigger("dev:css"));
    assert_eq!(
        dispatched(&step.commands),
        vec![("dev:css".to_string(), true)]
    );

    // Second save while the first run is still writing.
    let step = core.step(watch_trigger("dev:css"));
    assert_eq!(
        dispatched(&step.commands),
        vec![("dev:css".to_string(), false)]
    );
    assert!(core.queue_is_empty());

    let step = core.step(RuntimeEvent::TaskCompleted {
        task: "dev:css".into(),
        outcome: TaskOutcome::Success,
        tracked: false,
    });
    assert!(step.commands.is_empty());
    assert!(!core.is_idle());

    core.step(done("dev:css"));
    assert!(core.is_idle());
    assert_eq!(core.summary().succeeded, vec!["dev:css", "dev:css"]);
}

#[test]
fn unrelated_trigger_joins_the_active_run() {
    let plan = Plan::flat("watch", &[TaskKind::Html, TaskKind::Js]);
    let mut core = core(&plan, TriggerWhileRunningBehaviour::Queue, false);

    core.step(watch_trigger("html"));
    let step = core.step(watch_trigger("js"));
    assert_eq!(dispatched(&step.commands), vec![("js".to_string(), true)]);
    assert!(core.queue_is_empty());
}

#[test]
fn queue_behaviour_starts_a_follow_up_run() {
    let plan = Plan::flat("watch", &[TaskKind::Html]);
    let mut core = core(&plan, TriggerWhileRunningBehaviour::Queue, false);

    core.step(watch_trigger("html"));
    let step = core.step(watch_trigger("html"));
    assert!(dispatched(&step.commands).is_empty());
    assert!(!core.queue_is_empty());

    let step = core.step(done("html"));
    assert_eq!(dispatched(&step.commands), vec![("html".to_string(), true)]);
    assert!(core.queue_is_empty());
    assert_eq!(core.scheduler().last_run_id(), 2);
}

#[test]
fn queue_length_bounds_follow_up_runs() {
    let plan = Plan::flat("watch", &[TaskKind::Html, TaskKind::Js]);
    let mut core = core_with_queue(&plan, TriggerWhileRunningBehaviour::Queue, 2, false);

    core.step(watch_trigger("html"));
    core.step(watch_trigger("js"));
    assert!(core.queue_is_empty());

    // First repeat of each task shares one follow-up run.
    core.step(watch_trigger("html"));
    core.step(watch_trigger("js"));
    assert_eq!(core.queued_runs(), 1);

    // A second repeat needs another run; beyond queue_length it is dropped.
    core.step(watch_trigger("html"));
    core.step(watch_trigger("html"));
    core.step(watch_trigger("html"));
    assert_eq!(core.queued_runs(), 2);

    assert!(dispatched(&core.step(done("html")).commands).is_empty());
    let step = core.step(done("js"));
    assert_eq!(
        dispatched(&step.commands),
        vec![("html".to_string(), true), ("js".to_string(), true)]
    );
    assert_eq!(core.queued_runs(), 1);

    core.step(done("js"));
    let step = core.step(done("html"));
    assert_eq!(dispatched(&step.commands), vec![("html".to_string(), true)]);
    assert!(core.queue_is_empty());

    let step = core.step(done("html"));
    assert!(dispatched(&step.commands).is_empty());
    assert!(core.is_idle());
    assert_eq!(core.scheduler().last_run_id(), 3);
}

#[test]
fn queue_length_one_coalesces_repeated_triggers() {
    let plan = Plan::flat("watch", &[TaskKind::Html]);
    let mut core = core(&plan, TriggerWhileRunningBehaviour::Queue, false);

    core.step(watch_trigger("html"));
    for _ in 0..5 {
        core.step(watch_trigger("html"));
    }
    assert_eq!(core.queued_runs(), 1);

    core.step(done("html"));
    core.step(done("html"));
    assert!(core.is_idle());
    assert_eq!(core.scheduler().last_run_id(), 2);
}

#[test]
fn cancel_keeps_only_the_latest_trigger() {
    let plan = Plan::flat("watch", &[TaskKind::Html, TaskKind::Js]);
    let mut core = core_with_queue(&plan, TriggerWhileRunningBehaviour::Cancel, 3, false);

    core.step(watch_trigger("html"));
    core.step(watch_trigger("js"));
    let step = core.step(watch_trigger("html"));
    assert!(dispatched(&step.commands).is_empty());
    core.step(watch_trigger("js"));
    assert_eq!(core.queued_runs(), 1);

    core.step(done("html"));
    let step = core.step(done("js"));
    assert_eq!(dispatched(&step.commands), vec![("js".to_string(), true)]);
    assert!(core.queue_is_empty());

    let step = core.step(done("js"));
    assert!(dispatched(&step.commands).is_empty());
    assert!(core.is_idle());
    assert_eq!(core.scheduler().last_run_id(), 2);
}

#[test]
fn one_shot_core_requests_exit_when_idle() {
    let plan = Plan::from_recipe("s", &Recipe::series([TaskKind::Html, TaskKind::Js])).unwrap();
    let mut core = core(&plan, TriggerWhileRunningBehaviour::Overlap, true);

    core.step(trigger("html"));
    let step = core.step(done("html"));
    assert!(step.keep_running);
    assert_eq!(dispatched(&step.commands), vec![("js".to_string(), true)]);

    let step = core.step(done("js"));
    assert!(!step.keep_running);
    assert!(matches!(
        step.commands.last(),
        Some(CoreCommand::RequestExit)
    ));
}

#[test]
fn every_output_change_is_one_reload() {
    let plan = Plan::flat("watch", &[TaskKind::Html]);
    let mut core = core(&plan, TriggerWhileRunningBehaviour::Overlap, false);

    for path in ["dist/index.html", "dist/css/app.min.css"] {
        let step = core.step(RuntimeEvent::OutputChanged { path: path.into() });
        assert!(step.keep_running);
        assert_eq!(step.commands.len(), 1);
        assert!(matches!(&step.commands[0], CoreCommand::NotifyReload(p) if p == path));
    }
}

#[test]
fn trigger_outside_plan_is_ignored() {
    let plan = Plan::flat("watch", &[TaskKind::Html]);
    let mut core = core(&plan, TriggerWhileRunningBehaviour::Overlap, false);

    let step = core.step(watch_trigger("icon"));
    assert!(step.commands.is_empty());
    assert!(core.is_idle());
}
