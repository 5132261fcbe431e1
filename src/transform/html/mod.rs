// src/transform/html/mod.rs

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::fs::FileSystem;

pub mod beautify;
pub mod include;

pub use beautify::beautify;
pub use include::resolve_includes;

#[derive(Error, Debug)]
pub enum HtmlError {
    #[error("include file not found: {path:?} (included from {from:?})")]
    MissingInclude { path: PathBuf, from: PathBuf },

    #[error("cannot read include {path:?}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("include cycle: {path:?} includes itself")]
    IncludeCycle { path: PathBuf },

    #[error("includes nested deeper than {max} levels at {path:?}")]
    TooDeep { path: PathBuf, max: usize },

    #[error("malformed include directive in {path:?} at line {line}: {reason}")]
    BadDirective {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// Page rendering options, mirroring the `[html]` config section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    pub indent_size: usize,
    pub max_preserve_newlines: usize,
    pub include_prefix: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            indent_size: 2,
            max_preserve_newlines: 0,
            include_prefix: "@@".to_string(),
        }
    }
}

/// Resolve includes in a page, then beautify the result.
pub fn render_page(
    fs: &dyn FileSystem,
    path: &Path,
    source: &str,
    opts: &HtmlOptions,
) -> Result<String, HtmlError> {
    let expanded = resolve_includes(fs, path, source, &opts.include_prefix)?;
    Ok(beautify(&expanded, opts))
}
