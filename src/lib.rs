// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod pipeline;
pub mod server;
pub mod transform;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::cli::{CliArgs, Command};
use crate::config::loader::load_or_default;
use crate::config::model::{ConfigFile, RecipeEntry, WatchSection};
use crate::dag::{Plan, Recipe, Scheduler};
use crate::engine::{
    CoreRuntime, RunSummary, Runtime, RuntimeEvent, RuntimeOptions, TriggerReason,
};
use crate::errors::AssetflowError;
use crate::exec::RealExecutorBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::pipeline::{Pipeline, TaskKind};
use crate::server::{LiveServer, reload_channel};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the build plan for the chosen command
/// - scheduler / queue / runtime
/// - executor
/// - for `serve`: live server, file watcher and Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_or_default(&config_path)?;
    let root = config_root_dir(&config_path);
    let command = args.command();

    let plan = plan_for_command(&command, &cfg)?;

    if args.dry_run {
        print_dry_run(&cfg, &root, &command, &plan);
        return Ok(());
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let pipeline = Arc::new(Pipeline::from_config(fs, &root, &cfg));

    let summary = run_plan(Arc::clone(&pipeline), &plan, &cfg.watch).await?;
    ensure_success(&summary)?;
    info!(
        plan = plan.name(),
        tasks = summary.succeeded.len(),
        "build finished"
    );

    if command == Command::Serve {
        serve(pipeline, &cfg).await?;
    }
    Ok(())
}

/// The plan a command runs before (for `serve`) or instead of watching.
pub fn plan_for_command(command: &Command, cfg: &ConfigFile) -> Result<Plan> {
    let plan = match command {
        Command::Clean => Plan::from_recipe("clean", &Recipe::Task(TaskKind::Clean))?,
        Command::Build => Plan::from_recipe("prod:build", &Recipe::from_entries(&cfg.build.prod)?)?,
        Command::Dev => Plan::from_recipe("dev:build", &Recipe::from_entries(&cfg.build.dev)?)?,
        Command::Serve => {
            let mut entries = vec![RecipeEntry::Task(TaskKind::Clean.name().to_string())];
            entries.extend(
                cfg.build
                    .dev
                    .iter()
                    .filter(|e| e.task_names() != [TaskKind::Clean.name()])
                    .cloned(),
            );
            Plan::from_recipe("serve", &Recipe::from_entries(&entries)?)?
        }
        Command::Run { tasks } => {
            let entries: Vec<RecipeEntry> =
                tasks.iter().map(|t| RecipeEntry::Task(t.clone())).collect();
            Plan::from_recipe("run", &Recipe::from_entries(&entries)?)?
        }
    };
    Ok(plan)
}

/// Run `plan` to completion once and report what happened.
pub async fn run_plan(
    pipeline: Arc<Pipeline>,
    plan: &Plan,
    watch: &WatchSection,
) -> Result<RunSummary> {
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);
    let executor = RealExecutorBackend::new(pipeline, rt_tx.clone());

    let roots = plan.roots();
    info!(plan = plan.name(), ?roots, "starting build");
    for kind in roots {
        rt_tx
            .send(RuntimeEvent::TaskTriggered {
                task: kind.name().to_string(),
                reason: TriggerReason::Manual,
            })
            .await?;
    }

    let core = CoreRuntime::new(
        Scheduler::from_plan(plan),
        watch.triggered_while_running_behaviour,
        watch.queue_length,
        RuntimeOptions {
            exit_when_idle: true,
        },
    );
    let summary = Runtime::new(core, rt_rx, executor).run().await?;
    Ok(summary)
}

fn ensure_success(summary: &RunSummary) -> Result<()> {
    if summary.is_success() {
        return Ok(());
    }
    Err(AssetflowError::BuildFailed {
        failed: summary.failed.len(),
        tasks: summary.failed.join(", "),
    }
    .into())
}

/// Serve the output tree and re-run tasks as sources change, until Ctrl-C.
async fn serve(pipeline: Arc<Pipeline>, cfg: &ConfigFile) -> Result<()> {
    let layout = pipeline.layout().clone();
    let profiles = watch::build_watch_profiles(&layout, &cfg.watch.exclude)?;
    let watched = watch::watched_tasks(&profiles);

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(256);
    let (reload_tx, _) = reload_channel();

    let executor = RealExecutorBackend::new(pipeline, rt_tx.clone());
    let _watcher_handle = watch::spawn_watcher(layout.root(), profiles, rt_tx.clone())?;

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = LiveServer::new(&cfg.server, layout.output_dir(), reload_tx.clone());
    let server_task = tokio::spawn(server.serve(async move {
        let _ = stop_rx.await;
    }));

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let plan = Plan::flat("watch", &watched);
    let core = CoreRuntime::new(
        Scheduler::from_plan(&plan),
        cfg.watch.triggered_while_running_behaviour,
        cfg.watch.queue_length,
        RuntimeOptions {
            exit_when_idle: false,
        },
    );
    let summary = Runtime::new(core, rt_rx, executor)
        .with_reload(reload_tx)
        .run()
        .await?;
    if !summary.failed.is_empty() {
        warn!(failed = ?summary.failed, "some watch-triggered runs failed");
    }

    let _ = stop_tx.send(());
    match server_task.await {
        Ok(result) => result?,
        Err(err) => warn!("server task ended abnormally: {err}"),
    }
    Ok(())
}

/// Figure out the project root.
///
/// - If the config path has a non-empty parent (e.g. "site/Assetflow.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Assetflow.toml" (parent = ""),
///   we fall back to the current working directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Simple dry-run output: print the resolved layout and the plan.
fn print_dry_run(cfg: &ConfigFile, root: &Path, command: &Command, plan: &Plan) {
    println!("assetflow dry-run");
    println!("  root = {}", root.display());
    println!("  paths.source = {}", cfg.paths.source);
    println!("  paths.output = {}", cfg.paths.output);
    println!(
        "  watch.triggered_while_running_behaviour = {:?}",
        cfg.watch.triggered_while_running_behaviour
    );
    println!("  watch.queue_length = {}", cfg.watch.queue_length);
    println!();

    println!("command: {command:?}");
    println!("plan {} ({} tasks):", plan.name(), plan.tasks().len());
    for kind in plan.tasks() {
        let deps = plan.dependencies_of(*kind);
        if deps.is_empty() {
            println!("  - {kind}");
        } else {
            let deps: Vec<&str> = deps.iter().map(|d| d.name()).collect();
            println!("  - {kind} (after {})", deps.join(", "));
        }
    }

    debug!("dry-run complete (no execution)");
}
