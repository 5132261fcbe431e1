// src/transform/svg/minify.rs

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::xml::{Document, Element, Node};

static URL_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(\s*['"]?#([^'")\s]+)['"]?\s*\)"#).expect("valid regex"));

const EDITOR_PREFIXES: &[&str] = &["inkscape:", "sodipodi:", "sketch:"];
const EDITOR_NAMESPACES: &[&str] = &["xmlns:inkscape", "xmlns:sodipodi", "xmlns:sketch"];
const DROPPED_ELEMENTS: &[&str] = &["metadata", "title", "desc"];
const DROPPED_ATTRS: &[&str] = &["version", "enable-background"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinifyOptions {
    /// Prefix for the shortened ids, e.g. `home-` for `home.svg`.
    pub id_prefix: Option<String>,
}

/// Strip editor cruft and whitespace, then shorten ids.
pub fn minify(doc: &mut Document, opts: &MinifyOptions) {
    doc.nodes.retain(|n| matches!(n, Node::Element(_)));
    let Some(root) = doc.root_mut() else {
        return;
    };
    clean(root);

    let uses_xlink = {
        let mut found = false;
        root.walk(&mut |el| {
            found |= el.attrs.iter().any(|a| a.name.starts_with("xlink:"));
        });
        found
    };
    if !uses_xlink {
        root.remove_attr("xmlns:xlink");
    }

    cleanup_ids(root, opts.id_prefix.as_deref().unwrap_or(""));
}

fn clean(el: &mut Element) {
    el.attrs.retain(|a| {
        !DROPPED_ATTRS.contains(&a.name.as_str())
            && !EDITOR_NAMESPACES.contains(&a.name.as_str())
            && !EDITOR_PREFIXES.iter().any(|p| a.name.starts_with(p))
    });

    let keep_text = matches!(el.name.as_str(), "text" | "tspan" | "textPath" | "style");
    el.children.retain(|child| match child {
        Node::Element(c) => {
            !DROPPED_ELEMENTS.contains(&c.name.as_str())
                && !EDITOR_PREFIXES.iter().any(|p| c.name.starts_with(p))
        }
        Node::Text(t) => keep_text || !t.trim().is_empty(),
        Node::CData(_) => true,
        Node::Comment(_) | Node::Instruction(_) | Node::Doctype(_) => false,
    });

    for child in &mut el.children {
        if let Node::Element(c) = child {
            clean(c);
        }
    }

    // Containers left empty by the steps above.
    el.children.retain(|child| match child {
        Node::Element(c) => !(matches!(c.name.as_str(), "g" | "defs") && c.children.is_empty()),
        _ => true,
    });
}

/// `a`, `b`, ..., `z`, `aa`, `ab`, ...
pub fn short_id(mut n: usize) -> String {
    let mut bytes = Vec::new();
    loop {
        bytes.push(b'a' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    bytes.reverse();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn href_target(name: &str, value: &str) -> Option<String> {
    if name == "href" || name == "xlink:href" {
        value.strip_prefix('#').map(str::to_string)
    } else {
        None
    }
}

/// Rename referenced ids to `<prefix><short id>` and drop unreferenced ones.
pub fn cleanup_ids(root: &mut Element, prefix: &str) {
    let mut ids: Vec<String> = Vec::new();
    let mut referenced: HashSet<String> = HashSet::new();

    root.walk(&mut |el| {
        for attr in &el.attrs {
            if attr.name == "id" {
                ids.push(attr.value.clone());
                continue;
            }
            if let Some(target) = href_target(&attr.name, &attr.value) {
                referenced.insert(target);
            }
            for caps in URL_REF.captures_iter(&attr.value) {
                referenced.insert(caps[1].to_string());
            }
        }
        if el.name == "style" {
            for child in &el.children {
                if let Node::Text(t) | Node::CData(t) = child {
                    for caps in URL_REF.captures_iter(t) {
                        referenced.insert(caps[1].to_string());
                    }
                }
            }
        }
    });

    let mut renames: HashMap<String, String> = HashMap::new();
    for id in ids {
        if referenced.contains(&id) && !renames.contains_key(&id) {
            let short = format!("{prefix}{}", short_id(renames.len()));
            renames.insert(id, short);
        }
    }

    root.walk_mut(&mut |el| {
        el.attrs
            .retain(|a| a.name != "id" || renames.contains_key(&a.value));
        for attr in &mut el.attrs {
            if attr.name == "id" {
                if let Some(new) = renames.get(&attr.value) {
                    attr.value = new.clone();
                }
                continue;
            }
            if let Some(target) = href_target(&attr.name, &attr.value) {
                if let Some(new) = renames.get(&target) {
                    attr.value = format!("#{new}");
                }
                continue;
            }
            if attr.value.contains("url(") {
                attr.value = rewrite_urls(&attr.value, &renames);
            }
        }
        if el.name == "style" {
            for child in &mut el.children {
                if let Node::Text(t) | Node::CData(t) = child {
                    *t = rewrite_urls(t, &renames);
                }
            }
        }
    });
}

fn rewrite_urls(text: &str, renames: &HashMap<String, String>) -> String {
    URL_REF
        .replace_all(text, |caps: &Captures<'_>| match renames.get(&caps[1]) {
            Some(new) => format!("url(#{new})"),
            None => caps[0].to_string(),
        })
        .into_owned()
}
