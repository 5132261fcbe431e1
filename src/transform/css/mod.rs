// src/transform/css/mod.rs

//! Stylesheet processing: parse, inline imports, generate utility classes,
//! then (for production) prefix, purge and minify.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::Theme;
use crate::fs::FileSystem;

pub mod ast;
pub mod import;
pub mod minify;
pub mod parser;
pub mod prefix;
pub mod purge;
pub mod utilities;

pub use ast::{AtRule, Declaration, Node, Rule, Stylesheet};
pub use minify::minify;
pub use parser::parse;
pub use prefix::prefix;
pub use purge::{extract_candidates, purge};

#[derive(Error, Debug)]
pub enum CssError {
    #[error("line {line}: unclosed block")]
    UnclosedBlock { line: usize },

    #[error("line {line}: unexpected '}}'")]
    UnexpectedBrace { line: usize },

    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },

    #[error("line {line}: unterminated comment")]
    UnterminatedComment { line: usize },

    #[error("line {line}: invalid declaration `{text}`")]
    InvalidDeclaration { line: usize, text: String },

    #[error("invalid @import `{params}`")]
    BadImport { params: String },

    #[error("imported file not found: {path:?} (imported from {from:?})")]
    ImportNotFound { path: PathBuf, from: PathBuf },

    #[error("cannot read {path:?}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("`@apply` cannot be used with unknown utility `{class}` in `{selector}`")]
    UnknownUtility { class: String, selector: String },

    #[error("{path:?}: {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<CssError>,
    },
}

impl CssError {
    pub(crate) fn in_file(self, path: &Path) -> CssError {
        match self {
            already @ CssError::InFile { .. } => already,
            other => CssError::InFile {
                path: path.to_path_buf(),
                source: Box::new(other),
            },
        }
    }
}

/// Read `path`, inline its imports and expand `@tailwind` / `@apply`.
pub fn compile(fs: &dyn FileSystem, path: &Path, theme: &Theme) -> Result<Stylesheet, CssError> {
    let text = fs.read_to_string(path).map_err(|e| CssError::Read {
        path: path.to_path_buf(),
        message: format!("{e:#}"),
    })?;
    let sheet = parse(&text).map_err(|e| e.in_file(path))?;
    let sheet = import::inline_imports(fs, path, sheet)?;
    utilities::expand(sheet, theme)
}
