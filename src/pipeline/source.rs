// src/pipeline/source.rs

//! Source selection and output writing shared by the tasks.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, trace};

use crate::fs::FileSystem;

/// A file picked by a glob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute (root-joined) path.
    pub path: PathBuf,
    /// Path relative to the glob base, with forward slashes.
    pub rel: String,
}

impl SourceFile {
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }
}

/// Compile a glob where `*` never crosses `/`.
pub fn compile_glob(pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid glob pattern: {pattern}"))?;
    Ok(glob.compile_matcher())
}

/// The literal directory prefix of a glob.
///
/// `src/assets/images/**/*` has base `src/assets/images`; a glob without
/// wildcards (`src/css/app.css`) has its parent directory as base.
pub fn glob_base(pattern: &str) -> String {
    let parts: Vec<&str> = pattern.split('/').collect();
    let literal = parts
        .iter()
        .take_while(|p| !p.contains(['*', '?', '[', '{']))
        .count();
    let take = if literal == parts.len() {
        literal.saturating_sub(1)
    } else {
        literal
    };
    parts[..take].join("/")
}

/// All files under `root` matching `pattern`, sorted by path.
pub fn select(fs: &dyn FileSystem, root: &Path, pattern: &str) -> Result<Vec<SourceFile>> {
    let matcher = compile_glob(pattern)?;
    let base = glob_base(pattern);
    let base_dir = if base.is_empty() {
        root.to_path_buf()
    } else {
        root.join(&base)
    };

    if !fs.is_dir(&base_dir) {
        trace!(pattern, base = %base, "glob base does not exist");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let mut stack = vec![base_dir.clone()];
    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
                continue;
            }
            if !fs.is_file(&path) {
                continue;
            }
            let Ok(rel_root) = path.strip_prefix(root) else {
                continue;
            };
            let rel_root = to_slash(rel_root);
            if !matcher.is_match(&rel_root) {
                continue;
            }
            let rel = path
                .strip_prefix(&base_dir)
                .map(to_slash)
                .unwrap_or_else(|_| rel_root.clone());
            files.push(SourceFile { path, rel });
        }
    }

    files.sort_by(|a, b| a.rel.cmp(&b.rel));
    debug!(pattern, count = files.len(), "selected sources");
    Ok(files)
}

/// Concatenated text of every file matching any of `patterns`.
pub fn read_all(fs: &dyn FileSystem, root: &Path, patterns: &[String]) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for pattern in patterns {
        for file in select(fs, root, pattern)? {
            let bytes = fs.read(&file.path)?;
            out.push(String::from_utf8_lossy(&bytes).into_owned());
        }
    }
    Ok(out)
}

/// Whether `dest` is missing or older than `src`.
pub fn is_newer(fs: &dyn FileSystem, src: &Path, dest: &Path) -> Result<bool> {
    if !fs.exists(dest) {
        return Ok(true);
    }
    let src_time = fs.modified(src)?;
    let dest_time = fs.modified(dest)?;
    Ok(src_time > dest_time)
}

/// Copy `src` to `dest` through `transform` when `dest` is stale, keeping the
/// source modification time on the output. Returns whether a write happened.
pub fn copy_if_newer<F>(fs: &dyn FileSystem, src: &Path, dest: &Path, transform: F) -> Result<bool>
where
    F: FnOnce(Vec<u8>) -> Vec<u8>,
{
    if !is_newer(fs, src, dest)? {
        trace!(path = ?src, "up to date");
        return Ok(false);
    }
    let bytes = fs.read(src)?;
    fs.write(dest, &transform(bytes))?;
    let mtime = fs.modified(src)?;
    fs.set_modified(dest, mtime)?;
    debug!(from = ?src, to = ?dest, "copied");
    Ok(true)
}

/// Copy every file matched by `pattern` into `dest_dir`, skipping fresh ones.
pub fn copy_newer_tree<F>(
    fs: &dyn FileSystem,
    root: &Path,
    pattern: &str,
    dest_dir: &Path,
    transform: F,
) -> Result<crate::pipeline::TaskReport>
where
    F: Fn(&SourceFile, Vec<u8>) -> Vec<u8>,
{
    let mut report = crate::pipeline::TaskReport::default();
    for file in select(fs, root, pattern)? {
        let dest = dest_dir.join(&file.rel);
        if copy_if_newer(fs, &file.path, &dest, |bytes| transform(&file, bytes))? {
            report.written += 1;
        } else {
            report.skipped += 1;
        }
    }
    Ok(report)
}

/// Replace the extension of a forward-slash relative path.
pub fn with_extension(rel: &str, ext: &str) -> String {
    let path = Path::new(rel).with_extension(ext);
    to_slash(&path)
}

/// Insert `suffix` between the stem and the extension: `app.css` + `.min`
/// becomes `app.min.css`.
pub fn with_suffix(rel: &str, suffix: &str) -> String {
    let path = Path::new(rel);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let name = match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("{stem}{suffix}.{ext}"),
        None => format!("{stem}{suffix}"),
    };
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => format!("{}/{name}", to_slash(parent)),
        _ => name,
    }
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
