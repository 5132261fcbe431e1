// src/transform/css/import.rs

//! `@import` inlining.
//!
//! Local imports are resolved relative to the importing file and inlined
//! recursively, each file at most once. Remote imports stay in place. The
//! `tailwindcss/base|components|utilities` package imports turn into the
//! matching `@tailwind` directive.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::trace;

use super::ast::{AtRule, Node, Stylesheet};
use super::{CssError, parse};
use crate::fs::FileSystem;

pub fn inline_imports(
    fs: &dyn FileSystem,
    path: &Path,
    sheet: Stylesheet,
) -> Result<Stylesheet, CssError> {
    let mut seen = HashSet::new();
    seen.insert(path.to_path_buf());
    let nodes = inline(fs, path, sheet.nodes, &mut seen)?;
    Ok(Stylesheet::new(nodes))
}

fn inline(
    fs: &dyn FileSystem,
    path: &Path,
    nodes: Vec<Node>,
    seen: &mut HashSet<PathBuf>,
) -> Result<Vec<Node>, CssError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes {
        let at = match node {
            Node::AtRule(at) if at.name == "import" && at.nodes.is_none() => at,
            other => {
                out.push(other);
                continue;
            }
        };

        let (target, media) = import_target(&at.params)?;
        if is_remote(&target) {
            out.push(Node::AtRule(at));
            continue;
        }
        if let Some(layer) = target.strip_prefix("tailwindcss/") {
            out.push(Node::AtRule(AtRule {
                name: "tailwind".to_string(),
                params: layer.trim_end_matches(".css").to_string(),
                nodes: None,
            }));
            continue;
        }

        let file = resolve(fs, dir, &target).ok_or_else(|| CssError::ImportNotFound {
            path: dir.join(&target),
            from: path.to_path_buf(),
        })?;
        if !seen.insert(file.clone()) {
            trace!(path = ?file, "skipping already imported file");
            continue;
        }

        let text = fs.read_to_string(&file).map_err(|e| CssError::Read {
            path: file.clone(),
            message: format!("{e:#}"),
        })?;
        let imported = parse(&text).map_err(|e| e.in_file(&file))?;
        let children = inline(fs, &file, imported.nodes, seen)?;

        if media.is_empty() {
            out.extend(children);
        } else {
            out.push(Node::AtRule(AtRule::block("media", media, children)));
        }
    }
    Ok(out)
}

fn resolve(fs: &dyn FileSystem, dir: &Path, target: &str) -> Option<PathBuf> {
    let direct = dir.join(target);
    if fs.is_file(&direct) {
        return Some(direct);
    }
    let with_ext = dir.join(format!("{target}.css"));
    fs.is_file(&with_ext).then_some(with_ext)
}

fn is_remote(target: &str) -> bool {
    target.starts_with("http:") || target.starts_with("https:") || target.starts_with("//")
}

/// Split `"x.css" screen` or `url(x.css) print` into the target and the media
/// query list.
fn import_target(params: &str) -> Result<(String, String), CssError> {
    let bad = || CssError::BadImport {
        params: params.to_string(),
    };
    let params = params.trim();

    let (inner, rest) = if let Some(after) = params.strip_prefix("url(") {
        let close = after.find(')').ok_or_else(bad)?;
        (after[..close].trim(), &after[close + 1..])
    } else {
        (params, "")
    };

    let (target, tail) = match inner.chars().next() {
        Some(q @ ('"' | '\'')) => {
            let body = &inner[1..];
            let close = body.find(q).ok_or_else(bad)?;
            (&body[..close], &body[close + 1..])
        }
        Some(_) if !rest.is_empty() || params.starts_with("url(") => (inner, ""),
        _ => return Err(bad()),
    };

    if target.is_empty() {
        return Err(bad());
    }
    let media = format!("{} {}", tail.trim(), rest.trim());
    Ok((target.to_string(), media.trim().to_string()))
}
