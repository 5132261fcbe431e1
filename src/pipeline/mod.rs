// src/pipeline/mod.rs

//! The build tasks.
//!
//! Each [`TaskKind`] maps to one function in a submodule that reads its
//! sources through the [`FileSystem`] trait, runs the matching transform
//! chain and writes into the output tree. [`Pipeline::run`] is what the
//! executor calls on the blocking pool.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::config::ConfigFile;
use crate::fs::FileSystem;
use crate::transform::html::HtmlOptions;
use crate::types::BuildProfile;

mod clean;
mod css;
mod font;
mod html;
mod icon;
mod image;
mod js;
pub mod layout;
pub mod source;
mod static_files;

pub use layout::Layout;

/// A runnable build step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskKind {
    Clean,
    Html,
    Css(BuildProfile),
    Js,
    Font,
    Icon,
    Image,
    Static,
}

impl TaskKind {
    pub const ALL: [TaskKind; 9] = [
        TaskKind::Clean,
        TaskKind::Html,
        TaskKind::Css(BuildProfile::Prod),
        TaskKind::Css(BuildProfile::Dev),
        TaskKind::Js,
        TaskKind::Font,
        TaskKind::Icon,
        TaskKind::Image,
        TaskKind::Static,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TaskKind::Clean => "clean",
            TaskKind::Html => "html",
            TaskKind::Css(BuildProfile::Prod) => "prod:css",
            TaskKind::Css(BuildProfile::Dev) => "dev:css",
            TaskKind::Js => "js",
            TaskKind::Font => "font",
            TaskKind::Icon => "icon",
            TaskKind::Image => "image",
            TaskKind::Static => "static",
        }
    }

    pub fn from_name(name: &str) -> Option<TaskKind> {
        TaskKind::ALL.into_iter().find(|k| k.name() == name.trim())
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a single task run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskReport {
    /// Output files written.
    pub written: usize,
    /// Sources skipped because their output was already up to date.
    pub skipped: usize,
    /// Errors that were logged and swallowed instead of failing the task.
    pub swallowed: Vec<String>,
}

impl TaskReport {
    pub fn merge(&mut self, other: TaskReport) {
        self.written += other.written;
        self.skipped += other.skipped;
        self.swallowed.extend(other.swallowed);
    }
}

/// Runs build tasks against one project.
#[derive(Debug, Clone)]
pub struct Pipeline {
    fs: Arc<dyn FileSystem>,
    layout: Layout,
    html: HtmlOptions,
}

impl Pipeline {
    pub fn new(fs: Arc<dyn FileSystem>, layout: Layout, html: HtmlOptions) -> Self {
        Self { fs, layout, html }
    }

    pub fn from_config(fs: Arc<dyn FileSystem>, root: &Path, cfg: &ConfigFile) -> Self {
        let layout = Layout::new(root, &cfg.paths.source, &cfg.paths.output, &cfg.paths.theme);
        let html = HtmlOptions {
            indent_size: cfg.html.indent_size,
            max_preserve_newlines: cfg.html.max_preserve_newlines,
            include_prefix: cfg.html.include_prefix.clone(),
        };
        Self::new(fs, layout, html)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn run(&self, kind: TaskKind) -> Result<TaskReport> {
        debug!(task = %kind, "running pipeline task");
        let fs = self.fs.as_ref();
        match kind {
            TaskKind::Clean => clean::run(fs, &self.layout),
            TaskKind::Html => html::run(fs, &self.layout, &self.html),
            TaskKind::Css(profile) => css::run(fs, &self.layout, profile),
            TaskKind::Js => js::run(fs, &self.layout),
            TaskKind::Font => font::run(fs, &self.layout),
            TaskKind::Icon => icon::run(fs, &self.layout),
            TaskKind::Image => image::run(fs, &self.layout),
            TaskKind::Static => static_files::run(fs, &self.layout),
        }
    }
}

/// Run two independent sub-streams concurrently and merge their reports.
pub(crate) fn merge_streams<A, B>(a: A, b: B) -> Result<TaskReport>
where
    A: FnOnce() -> Result<TaskReport> + Send,
    B: FnOnce() -> Result<TaskReport> + Send,
{
    let (ra, rb) = std::thread::scope(|scope| {
        let ha = scope.spawn(a);
        let hb = scope.spawn(b);
        (ha.join(), hb.join())
    });
    let mut report = ra.map_err(|_| anyhow::anyhow!("sub-stream panicked"))??;
    report.merge(rb.map_err(|_| anyhow::anyhow!("sub-stream panicked"))??);
    Ok(report)
}
