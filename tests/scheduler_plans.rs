// tests/scheduler_plans.rs

use assetflow::config::RecipeEntry;
use assetflow::dag::{Plan, Recipe, Scheduler, TaskRunState};
use assetflow::engine::TaskOutcome;
use assetflow::errors::AssetflowError;
use assetflow::pipeline::TaskKind;
use assetflow::types::BuildProfile;

fn names(tasks: &[assetflow::dag::ScheduledTask]) -> Vec<&str> {
    tasks.iter().map(|t| t.name.as_str()).collect()
}

fn entries(items: &[&str]) -> Vec<RecipeEntry> {
    items
        .iter()
        .map(|s| RecipeEntry::Task(s.to_string()))
        .collect()
}

#[test]
fn series_plan_orders_every_step() {
    let recipe = Recipe::from_entries(&entries(&["clean", "html", "prod:css", "js"])).unwrap();
    let plan = Plan::from_recipe("prod:build", &recipe).unwrap();

    assert_eq!(
        plan.tasks(),
        &[
            TaskKind::Clean,
            TaskKind::Html,
            TaskKind::Css(BuildProfile::Prod),
            TaskKind::Js
        ]
    );
    assert_eq!(plan.roots(), vec![TaskKind::Clean]);
    assert_eq!(
        plan.dependencies_of(TaskKind::Js),
        vec![TaskKind::Css(BuildProfile::Prod)]
    );
    assert!(plan.dependencies_of(TaskKind::Clean).is_empty());
}

#[test]
fn parallel_group_shares_neighbours() {
    let mut items = entries(&["clean"]);
    items.push(RecipeEntry::Parallel(vec!["font".into(), "icon".into()]));
    items.push(RecipeEntry::Task("static".into()));
    let plan = Plan::from_recipe("p", &Recipe::from_entries(&items).unwrap()).unwrap();

    assert_eq!(plan.dependencies_of(TaskKind::Font), vec![TaskKind::Clean]);
    assert_eq!(plan.dependencies_of(TaskKind::Icon), vec![TaskKind::Clean]);
    assert_eq!(
        plan.dependencies_of(TaskKind::Static),
        vec![TaskKind::Font, TaskKind::Icon]
    );
}

#[test]
fn unknown_task_in_recipe_is_rejected() {
    let err = Recipe::from_entries(&entries(&["html", "sass"])).unwrap_err();
    assert!(matches!(err, AssetflowError::TaskNotFound(ref n) if n == "sass"));
}

#[test]
fn repeated_step_in_series_is_a_cycle() {
    let recipe = Recipe::from_entries(&entries(&["html", "js", "html"])).unwrap();
    let err = Plan::from_recipe("bad", &recipe).unwrap_err();
    assert!(matches!(err, AssetflowError::DagCycle(_)));
}

#[test]
fn series_schedules_one_step_at_a_time() {
    let plan = Plan::from_recipe(
        "s",
        &Recipe::series([TaskKind::Clean, TaskKind::Html, TaskKind::Js]),
    )
    .unwrap();
    let mut sched = Scheduler::from_plan(&plan);
    assert!(sched.is_idle());

    let ready = sched.handle_trigger("clean");
    assert_eq!(names(&ready), vec!["clean"]);
    assert_eq!(sched.run_state_of("html"), Some(TaskRunState::Pending));

    let ready = sched.handle_completion("clean", TaskOutcome::Success);
    assert_eq!(names(&ready), vec!["html"]);
    let ready = sched.handle_completion("html", TaskOutcome::Success);
    assert_eq!(names(&ready), vec!["js"]);
    let ready = sched.handle_completion("js", TaskOutcome::Success);
    assert!(ready.is_empty());
    assert!(sched.is_idle());
    assert_eq!(sched.last_run_id(), 1);
}

#[test]
fn parallel_members_are_dispatched_together() {
    let mut items = entries(&["clean"]);
    items.push(RecipeEntry::Parallel(vec![
        "js".into(),
        "font".into(),
        "image".into(),
    ]));
    let plan = Plan::from_recipe("p", &Recipe::from_entries(&items).unwrap()).unwrap();
    let mut sched = Scheduler::from_plan(&plan);

    sched.handle_trigger("clean");
    let ready = sched.handle_completion("clean", TaskOutcome::Success);
    assert_eq!(names(&ready), vec!["font", "image", "js"]);
    assert!(ready.iter().all(|t| t.tracked && t.run_id == 1));
}

#[test]
fn failure_fails_the_rest_of_the_series() {
    let plan = Plan::from_recipe(
        "s",
        &Recipe::series([
            TaskKind::Html,
            TaskKind::Js,
            TaskKind::Font,
            TaskKind::Static,
        ]),
    )
    .unwrap();
    let mut sched = Scheduler::from_plan(&plan);

    sched.handle_trigger("html");
    sched.handle_completion("html", TaskOutcome::Success);
    let step = sched.step_completion("js", TaskOutcome::Failed("boom".into()));

    assert!(step.newly_scheduled.is_empty());
    let mut failed = step.newly_failed.clone();
    failed.sort();
    assert_eq!(failed, vec!["font", "js", "static"]);
    assert!(step.run_just_finished);
    assert_eq!(sched.failed_tasks(), vec!["font", "js", "static"]);
}

#[test]
fn retrigger_after_success_reuses_earlier_results() {
    let plan = Plan::from_recipe("s", &Recipe::series([TaskKind::Html, TaskKind::Js])).unwrap();
    let mut sched = Scheduler::from_plan(&plan);

    sched.handle_trigger("html");
    sched.handle_completion("html", TaskOutcome::Success);
    sched.handle_completion("js", TaskOutcome::Success);
    assert!(sched.is_idle());

    sched.start_new_run();
    let ready = sched.handle_trigger("js");
    assert_eq!(names(&ready), vec!["js"]);
    assert_eq!(sched.run_state_of("html"), Some(TaskRunState::NotInRun));
}

#[test]
fn flat_plan_runs_only_the_triggered_task() {
    let plan = Plan::flat(
        "watch",
        &[
            TaskKind::Html,
            TaskKind::Css(BuildProfile::Dev),
            TaskKind::Js,
        ],
    );
    assert_eq!(plan.roots().len(), 3);

    let mut sched = Scheduler::from_plan(&plan);
    let ready = sched.handle_trigger("dev:css");
    assert_eq!(names(&ready), vec!["dev:css"]);
    assert_eq!(sched.tasks_in_current_run(), vec!["dev:css"]);

    sched.handle_completion("dev:css", TaskOutcome::Success);
    assert!(sched.is_idle());
}

#[test]
fn completion_for_task_not_running_is_ignored() {
    let plan = Plan::from_recipe("s", &Recipe::series([TaskKind::Html, TaskKind::Js])).unwrap();
    let mut sched = Scheduler::from_plan(&plan);
    sched.handle_trigger("html");

    let ready = sched.handle_completion("js", TaskOutcome::Success);
    assert!(ready.is_empty());
    assert_eq!(sched.run_state_of("js"), Some(TaskRunState::Pending));
}
