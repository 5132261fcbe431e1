// src/watch/path_utils.rs

use std::path::Path;

/// Convert `path` into a string relative to `root`, with forward slashes.
///
/// Falls back to comparing canonical paths, since notify may report a
/// different absolute prefix for the same directory (symlinks, `/private/var`
/// on macOS). Returns `None` if the path is not under `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(to_slashes(rel));
    }

    // A removed file can no longer be canonicalized; try its parent.
    let root_canon = root.canonicalize().ok()?;
    let path_canon = path.canonicalize().ok().or_else(|| {
        let parent = path.parent()?.canonicalize().ok()?;
        Some(parent.join(path.file_name()?))
    })?;

    path_canon.strip_prefix(&root_canon).ok().map(to_slashes)
}

fn to_slashes(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}
