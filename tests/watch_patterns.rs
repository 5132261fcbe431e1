// tests/watch_patterns.rs

use std::path::Path;

use assetflow::engine::{RuntimeEvent, TriggerReason};
use assetflow::pipeline::{Layout, TaskKind};
use assetflow::types::BuildProfile;
use assetflow::watch::{
    WatchProfile, WatchTarget, build_watch_profiles, events_for_path, watched_tasks,
};
use notify::EventKind;
use notify::event::{CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind};

const ROOT: &str = "/proj";

fn modified(profiles: &[WatchProfile], rel: &str) -> Vec<RuntimeEvent> {
    let root = Path::new(ROOT);
    events_for_path(
        root,
        &root.join(rel),
        &EventKind::Modify(ModifyKind::Any),
        profiles,
    )
}

fn triggered(events: &[RuntimeEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            RuntimeEvent::TaskTriggered {
                task,
                reason: TriggerReason::FileWatch,
            } => Some(task.clone()),
            _ => None,
        })
        .collect()
}

fn standard_profiles(exclude: &[String]) -> Vec<WatchProfile> {
    build_watch_profiles(&Layout::standard(Path::new(ROOT)), exclude).unwrap()
}

#[test]
fn sources_map_to_their_tasks() {
    let profiles = standard_profiles(&[]);
    let cases = [
        ("src/pages/index.shtml", "html"),
        ("src/partials/head.shtml", "html"),
        ("src/css/app.css", "dev:css"),
        ("theme.toml", "dev:css"),
        ("src/js/vendor/lib.js", "js"),
        ("src/assets/fonts/a.woff2", "font"),
        ("src/assets/icons/star.svg", "icon"),
        ("src/assets/images/team/a.png", "image"),
        ("src/assets/uploads/2024/b.jpg", "image"),
        ("src/robots.txt", "static"),
    ];
    for (path, task) in cases {
        assert_eq!(triggered(&modified(&profiles, path)), vec![task], "{path}");
    }
}

#[test]
fn unrelated_paths_trigger_nothing() {
    let profiles = standard_profiles(&[]);
    assert!(modified(&profiles, "README.md").is_empty());
    assert!(modified(&profiles, "src/css/nested/x.css").is_empty());
    assert!(modified(&profiles, "src/assets/fonts/sub/a.woff2").is_empty());
    assert!(modified(&profiles, "src/pages/notes").is_empty());
}

#[test]
fn output_changes_reload_but_removals_do_not() {
    let profiles = standard_profiles(&[]);
    let events = modified(&profiles, "dist/css/app.min.css");
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        RuntimeEvent::OutputChanged { path } if path == "dist/css/app.min.css"
    ));

    let root = Path::new(ROOT);
    let created = events_for_path(
        root,
        &root.join("dist/index.html"),
        &EventKind::Create(CreateKind::File),
        &profiles,
    );
    assert_eq!(created.len(), 1);

    let removed = events_for_path(
        root,
        &root.join("dist/index.html"),
        &EventKind::Remove(RemoveKind::File),
        &profiles,
    );
    assert!(removed.is_empty());
}

#[test]
fn metadata_changes_do_not_reload() {
    let profiles = standard_profiles(&[]);
    let root = Path::new(ROOT);
    let path = root.join("dist/assets/fonts/open-sans.woff2");

    let written = events_for_path(
        root,
        &path,
        &EventKind::Modify(ModifyKind::Data(DataChange::Content)),
        &profiles,
    );
    assert_eq!(written.len(), 1);

    let stamped = events_for_path(
        root,
        &path,
        &EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)),
        &profiles,
    );
    assert!(stamped.is_empty());

    // Sources still rebuild on a touch.
    let touched = events_for_path(
        root,
        &root.join("src/pages/index.shtml"),
        &EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)),
        &profiles,
    );
    assert_eq!(triggered(&touched), vec!["html".to_string()]);
}

#[test]
fn exclude_applies_to_sources_only() {
    let profiles = standard_profiles(&["**/_*".to_string()]);
    assert!(modified(&profiles, "src/js/_draft.js").is_empty());
    assert!(modified(&profiles, "src/_notes.txt").is_empty());
    assert_eq!(triggered(&modified(&profiles, "src/js/app.js")), vec!["js"]);
    assert_eq!(modified(&profiles, "dist/_preview.html").len(), 1);
}

#[test]
fn paths_outside_root_are_ignored() {
    let profiles = standard_profiles(&[]);
    let events = events_for_path(
        Path::new(ROOT),
        Path::new("/elsewhere/src/js/app.js"),
        &EventKind::Modify(ModifyKind::Any),
        &profiles,
    );
    assert!(events.is_empty());
}

#[test]
fn custom_layout_roots_are_respected() {
    let layout = Layout::new(Path::new(ROOT), "site/", "./public", "cfg/theme.toml");
    let profiles = build_watch_profiles(&layout, &[]).unwrap();
    assert_eq!(
        triggered(&modified(&profiles, "site/css/app.css")),
        vec!["dev:css"]
    );
    assert_eq!(
        triggered(&modified(&profiles, "cfg/theme.toml")),
        vec!["dev:css"]
    );
    assert!(triggered(&modified(&profiles, "src/css/app.css")).is_empty());
    assert_eq!(modified(&profiles, "public/index.html").len(), 1);
}

#[test]
fn watched_tasks_cover_every_development_task() {
    let profiles = standard_profiles(&[]);
    assert_eq!(
        watched_tasks(&profiles),
        vec![
            TaskKind::Html,
            TaskKind::Css(BuildProfile::Dev),
            TaskKind::Js,
            TaskKind::Font,
            TaskKind::Icon,
            TaskKind::Image,
            TaskKind::Static,
        ]
    );
    assert_eq!(
        profiles.last().map(|p| p.target()),
        Some(WatchTarget::Reload)
    );
}

#[test]
fn invalid_glob_is_an_error() {
    let err = WatchProfile::new(WatchTarget::Reload, vec!["dist/[".to_string()], &[]).unwrap_err();
    assert!(format!("{err:#}").contains("invalid glob pattern"));
}
