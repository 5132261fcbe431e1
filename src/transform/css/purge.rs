// src/transform/css/purge.rs

//! Removal of rules whose classes never appear in the content files.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::ast::{Node, Rule, Stylesheet};

static CANDIDATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^<>"'`\s]*[^<>"'`\s:]"#).expect("valid regex"));

/// At-rules kept as they are, whatever they contain.
const KEEP: &[&str] = &[
    "font-face",
    "keyframes",
    "page",
    "charset",
    "import",
    "namespace",
];

/// Every class-name candidate in a content file.
pub fn extract_candidates(content: &str) -> HashSet<String> {
    CANDIDATE_RE
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Drop selectors that use a class not in `used`. A rule survives when any
/// of its selectors survives; blocks left empty are dropped.
pub fn purge(sheet: Stylesheet, used: &HashSet<String>) -> Stylesheet {
    Stylesheet::new(purge_nodes(sheet.nodes, used))
}

fn purge_nodes(nodes: Vec<Node>, used: &HashSet<String>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Rule(rule) => {
                let kept: Vec<String> = rule
                    .selectors()
                    .into_iter()
                    .filter(|sel| selector_classes(sel).iter().all(|c| used.contains(c)))
                    .collect();
                if !kept.is_empty() {
                    out.push(Node::Rule(Rule::new(kept.join(", "), rule.nodes)));
                }
            }
            Node::AtRule(mut at) => {
                let keep_whole = KEEP.iter().any(|k| at.name.ends_with(k));
                if !keep_whole {
                    if let Some(children) = at.nodes.take() {
                        let children = purge_nodes(children, used);
                        if children.iter().all(|n| matches!(n, Node::Comment(_))) {
                            continue;
                        }
                        at.nodes = Some(children);
                    }
                }
                out.push(Node::AtRule(at));
            }
            other => out.push(other),
        }
    }
    out
}

/// Unescaped class names referenced by a single selector.
pub fn selector_classes(selector: &str) -> Vec<String> {
    let chars: Vec<char> = selector.chars().collect();
    let mut classes = Vec::new();
    let mut i = 0;
    let mut bracket = 0usize;
    let mut quote: Option<char> = None;

    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            if c == '\\' {
                i += 1;
            } else if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' => bracket += 1,
            ']' => bracket = bracket.saturating_sub(1),
            '\\' => i += 1,
            '.' if bracket == 0 => {
                let (name, next) = read_ident(&chars, i + 1);
                if !name.is_empty() {
                    classes.push(name);
                }
                i = next;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    classes
}

fn read_ident(chars: &[char], mut i: usize) -> (String, usize) {
    let mut name = String::new();
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            i += 1;
            let hex: String = chars[i..]
                .iter()
                .take(6)
                .take_while(|c| c.is_ascii_hexdigit())
                .collect();
            if !hex.is_empty() {
                i += hex.len();
                if let Some(ch) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    name.push(ch);
                }
                if chars.get(i) == Some(&' ') {
                    i += 1;
                }
            } else if let Some(&escaped) = chars.get(i) {
                name.push(escaped);
                i += 1;
            }
        } else if c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            name.push(c);
            i += 1;
        } else {
            break;
        }
    }
    (name, i)
}
