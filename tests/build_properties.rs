// tests/build_properties.rs

mod common;
use crate::common::{init_tracing, mock_pipeline, read_string, real_pipeline, snapshot_tree};

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use assetflow::config::{ConfigFile, WatchSection};
use assetflow::dag::{Plan, Recipe};
use assetflow::fs::FileSystem;
use assetflow::pipeline::TaskKind;
use assetflow::run_plan;
use assetflow::types::BuildProfile;
use assetflow_test_utils::fixtures::{mock_sample_site, write_sample_site};

fn prod_plan() -> Plan {
    let cfg = ConfigFile::default();
    Plan::from_recipe(
        "prod:build",
        &Recipe::from_entries(&cfg.build.prod).unwrap(),
    )
    .unwrap()
}

fn run_all(root: &Path) {
    let pipeline = real_pipeline(root);
    for kind in prod_plan().tasks() {
        pipeline.run(*kind).unwrap();
    }
}

#[test]
fn production_build_is_byte_stable() {
    init_tracing();
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    write_sample_site(first.path());
    write_sample_site(second.path());

    run_all(first.path());
    run_all(second.path());
    // A rebuild in place must not change anything either.
    run_all(first.path());

    let a = snapshot_tree(&first.path().join("dist"));
    let b = snapshot_tree(&second.path().join("dist"));
    assert!(!a.is_empty());
    assert_eq!(a, b);

    let expected: Vec<&str> = vec![
        "about.html",
        "assets/fonts/open-sans.woff2",
        "assets/images/icons.svg",
        "assets/images/logo.png",
        "assets/uploads/2024/photo.png",
        "css/app.min.css",
        "css/fonts.css",
        "index.html",
        "js/app.min.js",
        "js/vendors/vendor.js",
        "robots.txt",
    ];
    let mut actual: Vec<&str> = a.keys().map(|k| k.as_str()).collect();
    actual.sort();
    assert_eq!(actual, expected);
}

#[test]
fn production_outputs_have_expected_shape() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_site(dir.path());
    run_all(dir.path());
    let dist = dir.path().join("dist");

    let index = std::fs::read_to_string(dist.join("index.html")).unwrap();
    assert!(index.starts_with("<!DOCTYPE html>\n"));
    assert!(index.contains("<title>Home</title>"));
    assert!(!index.contains("@@"));

    let about = std::fs::read_to_string(dist.join("about.html")).unwrap();
    assert!(about.contains("<title>About</title>"));

    let css = std::fs::read_to_string(dist.join("css/app.min.css")).unwrap();
    assert!(!css.contains('\n'));
    assert!(css.contains(".btn-primary{"));
    assert!(css.contains("-webkit-user-select:none"));
    assert!(css.contains(".text-blue-500{color:#3b82f6}"));
    assert!(css.contains(".hidden{display:none}"));
    // Never referenced by pages or scripts.
    assert!(!css.contains(".text-red-500"));

    let js = std::fs::read_to_string(dist.join("js/app.min.js")).unwrap();
    assert!(!js.contains("Toggle the mobile menu"));
    assert!(js.contains("function toggleMenu(id){"));

    let png = std::fs::read(dist.join("assets/images/logo.png")).unwrap();
    let src_png = std::fs::read(dir.path().join("src/assets/images/logo.png")).unwrap();
    assert!(png.len() < src_png.len());
    assert!(!png.windows(4).any(|w| w == b"tEXt"));
}

#[test]
fn copy_tasks_do_not_rewrite_fresh_outputs() {
    let root = Path::new("/site");
    let fs = mock_sample_site(root);
    let pipeline = mock_pipeline(&fs, root);

    let copy_tasks = [TaskKind::Font, TaskKind::Image, TaskKind::Static];
    for kind in copy_tasks {
        let report = pipeline.run(kind).unwrap();
        assert!(report.written > 0, "{kind} wrote nothing on first run");
    }

    let writes = fs.write_count();
    for kind in copy_tasks {
        let report = pipeline.run(kind).unwrap();
        assert_eq!(report.written, 0, "{kind} rewrote fresh outputs");
        assert!(report.skipped > 0);
    }
    assert_eq!(fs.write_count(), writes);
}

#[test]
fn touched_source_is_copied_again() {
    let root = Path::new("/site");
    let fs = mock_sample_site(root);
    let pipeline = mock_pipeline(&fs, root);

    pipeline.run(TaskKind::Static).unwrap();
    fs.add_file(
        root.join("src/robots.txt"),
        b"User-agent: *\nDisallow: /\n".to_vec(),
    );

    let report = pipeline.run(TaskKind::Static).unwrap();
    assert_eq!(report.written, 1);
    assert_eq!(
        read_string(&fs, &root.join("dist/robots.txt")),
        "User-agent: *\nDisallow: /\n"
    );
}

#[test]
fn js_vendors_are_copied_once() {
    let root = Path::new("/site");
    let fs = mock_sample_site(root);
    let pipeline = mock_pipeline(&fs, root);

    let first = pipeline.run(TaskKind::Js).unwrap();
    assert_eq!(first.written, 2);

    // app.min.js is always regenerated; the vendor file is not.
    let second = pipeline.run(TaskKind::Js).unwrap();
    assert_eq!(second.written, 1);
    assert_eq!(second.skipped, 1);
}

#[test]
fn stylesheet_syntax_error_still_copies_fonts() {
    init_tracing();
    let root = Path::new("/site");
    let fs = mock_sample_site(root);
    fs.add_file(
        root.join("src/css/app.css"),
        b".broken { color: red;\n".to_vec(),
    );
    let pipeline = mock_pipeline(&fs, root);

    let css = pipeline.run(TaskKind::Css(BuildProfile::Prod)).unwrap();
    assert_eq!(css.swallowed.len(), 1);
    assert!(css.swallowed[0].contains("unclosed block"));
    assert!(fs.exists(&root.join("dist/css/fonts.css")));
    assert!(!fs.exists(&root.join("dist/css/app.min.css")));

    let fonts = pipeline.run(TaskKind::Font).unwrap();
    assert_eq!(fonts.written, 1);
    assert!(fs.is_file(&root.join("dist/assets/fonts/open-sans.woff2")));
}

#[test]
fn unknown_apply_utility_is_swallowed() {
    let root = Path::new("/site");
    let fs = mock_sample_site(root);
    fs.add_file(
        root.join("src/css/app.css"),
        b".btn { @apply not-a-utility; }\n".to_vec(),
    );
    let pipeline = mock_pipeline(&fs, root);

    let report = pipeline.run(TaskKind::Css(BuildProfile::Dev)).unwrap();
    assert_eq!(report.written, 1);
    assert!(report.swallowed[0].contains("not-a-utility"));
}

#[test]
fn apply_with_variants_writes_the_stylesheet() {
    let root = Path::new("/site");
    let fs = mock_sample_site(root);
    fs.add_file(
        root.join("src/css/app.css"),
        b".btn { @apply bg-blue-500 hover:bg-blue-700 md:p-4; }\n".to_vec(),
    );
    let pipeline = mock_pipeline(&fs, root);

    let report = pipeline.run(TaskKind::Css(BuildProfile::Dev)).unwrap();
    assert!(report.swallowed.is_empty(), "{:?}", report.swallowed);
    let css = read_string(&fs, &root.join("dist/css/app.min.css"));
    assert!(css.contains(".btn:hover {"), "{css}");
    assert!(css.contains("@media (min-width: 768px)"), "{css}");
}

#[test]
fn dev_stylesheet_is_not_minified() {
    let root = Path::new("/site");
    let fs = mock_sample_site(root);
    let pipeline = mock_pipeline(&fs, root);

    let report = pipeline.run(TaskKind::Css(BuildProfile::Dev)).unwrap();
    assert!(report.swallowed.is_empty());
    let css = read_string(&fs, &root.join("dist/css/app.min.css"));
    assert!(css.contains('\n'));
    // Nothing is purged in development.
    assert!(css.contains(".text-red-500"));
}

#[test]
fn icon_sprite_has_no_id_collisions() {
    let root = Path::new("/site");
    let fs = mock_sample_site(root);
    let pipeline = mock_pipeline(&fs, root);

    pipeline.run(TaskKind::Icon).unwrap();
    let sprite = read_string(&fs, &root.join("dist/assets/images/icons.svg"));

    let ids: Vec<&str> = sprite
        .split("id=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .collect();
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len(), "duplicate ids in {sprite}");

    for id in ["icon-heart", "icon-star", "heart-a", "star-a"] {
        assert!(unique.contains(id), "missing id {id} in {sprite}");
    }
    assert!(sprite.contains("url(#star-a)"));
    assert!(sprite.contains("url(#heart-a)"));
    assert!(!sprite.contains("<title>"));
}

#[test]
fn missing_icon_directory_writes_nothing() {
    let root = Path::new("/site");
    let fs = mock_sample_site(root);
    fs.remove_dir_all(&root.join("src/assets/icons")).unwrap();
    let pipeline = mock_pipeline(&fs, root);

    let report = pipeline.run(TaskKind::Icon).unwrap();
    assert_eq!(report.written, 0);
    assert!(!fs.exists(&root.join("dist/assets/images/icons.svg")));
}

#[test]
fn missing_include_fails_html_task() {
    let root = Path::new("/site");
    let fs = mock_sample_site(root);
    fs.add_file(
        root.join("src/pages/broken.shtml"),
        b"@@include('nope.shtml')\n".to_vec(),
    );
    let pipeline = mock_pipeline(&fs, root);

    let err = pipeline.run(TaskKind::Html).unwrap_err();
    assert!(format!("{err:#}").contains("include file not found"));
}

#[tokio::test]
async fn clean_then_build_leaves_no_stale_files() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    write_sample_site(dir.path());
    let dist = dir.path().join("dist");

    std::fs::create_dir_all(dist.join("old")).unwrap();
    std::fs::write(dist.join("old/stale.html"), "stale").unwrap();
    std::fs::write(dist.join("gone.txt"), "stale").unwrap();
    std::fs::remove_file(dir.path().join("src/robots.txt")).unwrap();

    let pipeline = Arc::new(real_pipeline(dir.path()));
    let summary = run_plan(pipeline, &prod_plan(), &WatchSection::default())
        .await
        .unwrap();
    assert!(summary.is_success(), "{summary:?}");
    assert_eq!(summary.succeeded.len(), 8);

    let files = snapshot_tree(&dist);
    assert!(!files.contains_key("old/stale.html"));
    assert!(!files.contains_key("gone.txt"));
    assert!(!files.contains_key("robots.txt"));
    assert!(files.contains_key("index.html"));
    assert!(files.contains_key("css/app.min.css"));
}

#[tokio::test]
async fn failing_task_fails_its_dependents() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_site(dir.path());
    std::fs::write(dir.path().join("src/js/app.js"), "var s = 'unterminated;\n").unwrap();

    let pipeline = Arc::new(real_pipeline(dir.path()));
    let summary = run_plan(pipeline, &prod_plan(), &WatchSection::default())
        .await
        .unwrap();

    assert!(!summary.is_success());
    for task in ["js", "font", "icon", "image", "static"] {
        assert!(
            summary.failed.iter().any(|t| t == task),
            "{task} not failed: {summary:?}"
        );
    }
    for task in ["clean", "html", "prod:css"] {
        assert!(
            summary.succeeded.iter().any(|t| t == task),
            "{task} did not run: {summary:?}"
        );
    }
    assert!(!dir.path().join("dist/robots.txt").exists());
}
