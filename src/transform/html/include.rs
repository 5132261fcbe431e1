// src/transform/html/include.rs

//! `@@include('partial.html', { "title": "Home" })` expansion.
//!
//! Include paths are relative to the including file. Inside an included
//! file, `@@title` (or `@@nav.active` for nested objects) is replaced with
//! the value passed in the include's context; contexts are inherited by
//! nested includes. Unknown variables are left as they are.

use std::path::{Component, Path, PathBuf};

use regex::Regex;
use serde_json::{Map, Value};
use tracing::trace;

use super::HtmlError;
use crate::fs::FileSystem;

pub const MAX_DEPTH: usize = 32;

struct Resolver<'a> {
    fs: &'a dyn FileSystem,
    directive: Regex,
    variable: Regex,
    stack: Vec<PathBuf>,
}

/// Expand every include directive in `source`, which was read from `path`.
pub fn resolve_includes(
    fs: &dyn FileSystem,
    path: &Path,
    source: &str,
    prefix: &str,
) -> Result<String, HtmlError> {
    let escaped = regex::escape(prefix);
    let directive = Regex::new(&format!(r"{escaped}include\s*\(")).map_err(|e| bad(path, 0, e))?;
    let variable = Regex::new(&format!(
        r"{escaped}([A-Za-z_][A-Za-z0-9_\-]*(?:\.[A-Za-z0-9_\-]+)*)"
    ))
    .map_err(|e| bad(path, 0, e))?;

    let mut resolver = Resolver {
        fs,
        directive,
        variable,
        stack: vec![path.to_path_buf()],
    };
    resolver.expand(path, source, &Map::new())
}

fn bad(path: &Path, line: usize, reason: impl ToString) -> HtmlError {
    HtmlError::BadDirective {
        path: path.to_path_buf(),
        line,
        reason: reason.to_string(),
    }
}

impl Resolver<'_> {
    fn expand(
        &mut self,
        path: &Path,
        source: &str,
        ctx: &Map<String, Value>,
    ) -> Result<String, HtmlError> {
        let text = self.substitute(source, ctx);
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        while let Some(m) = self.directive.find_at(&text, cursor) {
            out.push_str(&text[cursor..m.start()]);
            let line = text[..m.start()].matches('\n').count() + 1;
            let (args, end) = split_arguments(&text, m.end())
                .ok_or_else(|| bad(path, line, "unterminated include"))?;
            let (target, child_ctx) = parse_arguments(args).map_err(|r| bad(path, line, r))?;

            let mut merged = ctx.clone();
            merged.extend(child_ctx);

            let include_path = normalize(&dir.join(&target));
            out.push_str(&self.include(path, &include_path, &merged)?);
            cursor = end;
        }
        out.push_str(&text[cursor..]);
        Ok(out)
    }

    fn include(
        &mut self,
        from: &Path,
        path: &Path,
        ctx: &Map<String, Value>,
    ) -> Result<String, HtmlError> {
        if self.stack.iter().any(|p| p == path) {
            return Err(HtmlError::IncludeCycle {
                path: path.to_path_buf(),
            });
        }
        if self.stack.len() > MAX_DEPTH {
            return Err(HtmlError::TooDeep {
                path: path.to_path_buf(),
                max: MAX_DEPTH,
            });
        }
        if !self.fs.is_file(path) {
            return Err(HtmlError::MissingInclude {
                path: path.to_path_buf(),
                from: from.to_path_buf(),
            });
        }
        let source = self.fs.read_to_string(path).map_err(|e| HtmlError::Read {
            path: path.to_path_buf(),
            message: format!("{e:#}"),
        })?;
        trace!(path = ?path, depth = self.stack.len(), "including");

        self.stack.push(path.to_path_buf());
        let expanded = self.expand(path, &source, ctx);
        self.stack.pop();
        expanded
    }

    fn substitute(&self, text: &str, ctx: &Map<String, Value>) -> String {
        if ctx.is_empty() {
            return text.to_string();
        }
        self.variable
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let name = &caps[1];
                if name == "include" {
                    return caps[0].to_string();
                }
                match lookup(ctx, name) {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Drop `.` and fold `..` components without touching the filesystem, so a
/// partial reached through different relative paths is one include.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn lookup<'v>(ctx: &'v Map<String, Value>, dotted: &str) -> Option<&'v Value> {
    let mut parts = dotted.split('.');
    let mut current = ctx.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Return the text between the directive's `(` and its matching `)`, and
/// the offset just past the `)`.
fn split_arguments(text: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = start;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b'{' | b'[' | b'(' => depth += 1,
                b'}' | b']' => depth = depth.saturating_sub(1),
                b')' if depth == 0 => return Some((&text[start..i], i + 1)),
                b')' => depth -= 1,
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Parse `'path', { json }` into the path and the context object.
fn parse_arguments(args: &str) -> Result<(String, Map<String, Value>), String> {
    let args = args.trim();
    let quote = args
        .chars()
        .next()
        .filter(|c| *c == '\'' || *c == '"')
        .ok_or_else(|| "include path must be a quoted string".to_string())?;
    let rest = &args[1..];
    let close = rest
        .find(quote)
        .ok_or_else(|| "unterminated include path".to_string())?;
    let target = rest[..close].to_string();
    if target.is_empty() {
        return Err("empty include path".to_string());
    }

    let tail = rest[close + 1..].trim();
    if tail.is_empty() {
        return Ok((target, Map::new()));
    }
    let json = tail
        .strip_prefix(',')
        .ok_or_else(|| format!("unexpected text after include path: {tail}"))?
        .trim();
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => Ok((target, map)),
        Ok(_) => Err("include context must be a JSON object".to_string()),
        Err(e) => Err(format!("invalid include context: {e}")),
    }
}
