// src/watch/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::pipeline::TaskKind;
use crate::pipeline::layout::Layout;

/// What a watched path change should cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchTarget {
    /// Re-run a single task.
    Task(TaskKind),
    /// Tell connected browsers to reload.
    Reload,
}

impl fmt::Display for WatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchTarget::Task(kind) => write!(f, "{kind}"),
            WatchTarget::Reload => f.write_str("reload"),
        }
    }
}

/// Compiled watch/exclude glob patterns for one watch target.
///
/// Patterns are relative to the project root; the watcher passes relative
/// paths (e.g. `"src/css/app.css"`) into `matches`.
#[derive(Clone)]
pub struct WatchProfile {
    target: WatchTarget,
    patterns: Vec<String>,
    watch_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for WatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchProfile")
            .field("target", &self.target)
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl WatchProfile {
    pub fn new(target: WatchTarget, patterns: Vec<String>, exclude: &[String]) -> Result<Self> {
        let watch_set = build_globset(&patterns)
            .with_context(|| format!("building watch globset for {target}"))?;
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(
                build_globset(exclude)
                    .with_context(|| format!("building exclude globset for {target}"))?,
            )
        };
        Ok(Self {
            target,
            patterns,
            watch_set,
            exclude_set,
        })
    }

    pub fn target(&self) -> WatchTarget {
        self.target
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns true if this profile is interested in `rel_path`.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.watch_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

/// The development watch map: which source globs re-run which task, plus
/// the output tree that triggers browser reloads.
///
/// Stylesheet changes always run the development chain. `exclude` is applied
/// to the source watchers only.
pub fn build_watch_profiles(layout: &Layout, exclude: &[String]) -> Result<Vec<WatchProfile>> {
    let task = |kind: TaskKind, patterns: Vec<String>| {
        WatchProfile::new(WatchTarget::Task(kind), patterns, exclude)
    };

    Ok(vec![
        task(TaskKind::Html, vec![layout.src("**/*.shtml")])?,
        task(
            TaskKind::Css(crate::types::BuildProfile::Dev),
            vec![layout.src("css/*.css"), layout.theme_rel().to_string()],
        )?,
        task(TaskKind::Js, vec![layout.src("js/**/*.js")])?,
        task(TaskKind::Font, vec![layout.src("assets/fonts/*")])?,
        task(TaskKind::Icon, vec![layout.src("assets/icons/*")])?,
        task(
            TaskKind::Image,
            vec![
                layout.src("assets/images/**/*"),
                layout.src("assets/uploads/**/*"),
            ],
        )?,
        task(TaskKind::Static, vec![layout.src("*.*")])?,
        WatchProfile::new(WatchTarget::Reload, vec![layout.dist("**/*.*")], &[])?,
    ])
}

/// Tasks that some source watcher can trigger.
pub fn watched_tasks(profiles: &[WatchProfile]) -> Vec<TaskKind> {
    profiles
        .iter()
        .filter_map(|p| match p.target() {
            WatchTarget::Task(kind) => Some(kind),
            WatchTarget::Reload => None,
        })
        .collect()
}

/// `*` must not cross directory boundaries, matching how sources are
/// selected for a build.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
