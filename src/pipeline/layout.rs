// src/pipeline/layout.rs

use std::path::{Path, PathBuf};

/// Fixed project layout under configurable source and output roots.
///
/// Globs are expressed relative to [`Layout::root`] with forward slashes,
/// e.g. `src/pages/*.shtml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    source: String,
    output: String,
    theme: String,
}

impl Layout {
    pub fn new(root: &Path, source: &str, output: &str, theme: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            source: trim_slashes(source),
            output: trim_slashes(output),
            theme: trim_slashes(theme),
        }
    }

    /// The stock `src` / `dist` / `theme.toml` layout under `root`.
    pub fn standard(root: &Path) -> Self {
        Self::new(root, "src", "dist", "theme.toml")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join(&self.source)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.output)
    }

    pub fn theme_file(&self) -> PathBuf {
        self.root.join(&self.theme)
    }

    /// Root-relative name of the theme file, for watch globs.
    pub fn theme_rel(&self) -> &str {
        &self.theme
    }

    /// A glob under the source root, e.g. `src("css/*.css")`.
    pub fn src(&self, rel: &str) -> String {
        format!("{}/{}", self.source, rel)
    }

    /// A glob under the output root.
    pub fn dist(&self, rel: &str) -> String {
        format!("{}/{}", self.output, rel)
    }

    /// A path under the output root.
    pub fn dest(&self, rel: &str) -> PathBuf {
        self.output_dir().join(rel)
    }
}

fn trim_slashes(s: &str) -> String {
    let s = s.trim().trim_start_matches("./");
    s.trim_end_matches('/').to_string()
}
