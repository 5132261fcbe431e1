// src/transform/svg/sprite.rs

//! Combine icons into one `<symbol>` sprite.

use super::xml::{Attr, Element, Node};
use super::{Document, SvgError};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Build a sprite from `(symbol id, icon)` pairs, in the given order.
///
/// `<defs>` content of every icon is hoisted into a single shared `<defs>`
/// at the top of the sprite.
pub fn build_sprite(icons: Vec<(String, Document)>) -> Result<String, SvgError> {
    let mut defs: Vec<Node> = Vec::new();
    let mut symbols: Vec<Node> = Vec::new();

    for (id, doc) in icons {
        let root = doc
            .nodes
            .into_iter()
            .find_map(|n| match n {
                Node::Element(el) => Some(el),
                _ => None,
            })
            .ok_or(SvgError::NoRoot)?;
        if root.name != "svg" {
            return Err(SvgError::NotSvg { found: root.name });
        }

        let mut symbol = Element::new("symbol");
        symbol.attrs.push(Attr {
            name: "id".to_string(),
            value: id,
        });
        for keep in ["viewBox", "preserveAspectRatio"] {
            if let Some(value) = root.attr(keep) {
                symbol.set_attr(keep, value);
            }
        }
        symbol.children = hoist_defs(root.children, &mut defs);
        symbols.push(Node::Element(symbol));
    }

    let mut sprite = Element::new("svg");
    sprite.set_attr("xmlns", SVG_NS);

    let mut uses_xlink = false;
    for node in defs.iter().chain(symbols.iter()) {
        if let Node::Element(el) = node {
            el.walk(&mut |e| {
                uses_xlink |= e.attrs.iter().any(|a| a.name.starts_with("xlink:"));
            });
        }
    }
    if uses_xlink {
        sprite.set_attr("xmlns:xlink", XLINK_NS);
    }

    if !defs.is_empty() {
        let mut combined = Element::new("defs");
        combined.children = defs;
        sprite.children.push(Node::Element(combined));
    }
    sprite.children.extend(symbols);

    let mut out = String::new();
    sprite.write(&mut out);
    Ok(out)
}

fn hoist_defs(children: Vec<Node>, defs: &mut Vec<Node>) -> Vec<Node> {
    let mut kept = Vec::with_capacity(children.len());
    for child in children {
        match child {
            Node::Element(el) if el.name == "defs" => {
                defs.extend(el.children);
            }
            Node::Element(mut el) => {
                el.children = hoist_defs(el.children, defs);
                kept.push(Node::Element(el));
            }
            other => kept.push(other),
        }
    }
    kept
}
