// src/config/model.rs

use serde::Deserialize;

use crate::types::TriggerWhileRunningBehaviour;

/// Top-level configuration as read from `Assetflow.toml`.
///
/// ```toml
/// [paths]
/// source = "src"
/// output = "dist"
///
/// [server]
/// port = 3000
///
/// [build]
/// prod = ["clean", "html", "prod:css", "js", "font", "icon", "image", "static"]
/// ```
///
/// All sections are optional and default to the stock project layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub html: HtmlSection,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub build: BuildSection,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holders can rely on
/// recipes referencing known tasks and on sane global values.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub paths: PathsSection,
    pub html: HtmlSection,
    pub server: ServerSection,
    pub watch: WatchSection,
    pub build: BuildSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            paths: raw.paths,
            html: raw.html,
            server: raw.server,
            watch: raw.watch,
            build: raw.build,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default())
    }
}

/// `[paths]` section. All paths are relative to the project root.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Source tree root.
    pub source: String,
    /// Generated output root (served by `serve`, wiped by `clean`).
    pub output: String,
    /// Theme file consumed by utility-class generation.
    pub theme: String,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            source: "src".to_string(),
            output: "dist".to_string(),
            theme: "theme.toml".to_string(),
        }
    }
}

/// `[html]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HtmlSection {
    pub indent_size: usize,
    /// Number of consecutive blank lines kept by the beautifier.
    pub max_preserve_newlines: usize,
    /// Marker that introduces `include(...)` directives and variables.
    pub include_prefix: String,
}

impl Default for HtmlSection {
    fn default() -> Self {
        Self {
            indent_size: 2,
            max_preserve_newlines: 0,
            include_prefix: "@@".to_string(),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Show an in-page badge before reloading.
    pub notify: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            notify: false,
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchSection {
    pub triggered_while_running_behaviour: TriggerWhileRunningBehaviour,

    /// Maximum number of queued runs to remember (`queue` / `cancel` only).
    pub queue_length: usize,

    /// Extra exclude globs applied to every source watcher.
    pub exclude: Vec<String>,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            triggered_while_running_behaviour: TriggerWhileRunningBehaviour::default(),
            queue_length: 1,
            exclude: Vec::new(),
        }
    }
}

/// One step of a build recipe: a task name, or a group of task names that
/// run in parallel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecipeEntry {
    Task(String),
    Parallel(Vec<String>),
}

impl RecipeEntry {
    pub fn task_names(&self) -> Vec<&str> {
        match self {
            RecipeEntry::Task(name) => vec![name.as_str()],
            RecipeEntry::Parallel(names) => names.iter().map(|s| s.as_str()).collect(),
        }
    }
}

/// `[build]` section: the ordered steps of the production and development
/// builds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    pub prod: Vec<RecipeEntry>,
    pub dev: Vec<RecipeEntry>,
}

fn steps(names: &[&str]) -> Vec<RecipeEntry> {
    names
        .iter()
        .map(|n| RecipeEntry::Task((*n).to_string()))
        .collect()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            prod: steps(&[
                "clean", "html", "prod:css", "js", "font", "icon", "image", "static",
            ]),
            dev: steps(&["html", "dev:css", "js", "font", "icon", "image", "static"]),
        }
    }
}
