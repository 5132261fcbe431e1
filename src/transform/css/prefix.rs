// src/transform/css/prefix.rs

//! Table-driven vendor prefixing.

use super::ast::{Declaration, Node, Stylesheet};

const PROPERTIES: &[(&str, &[&str])] = &[
    ("appearance", &["-webkit-", "-moz-"]),
    ("backdrop-filter", &["-webkit-"]),
    ("box-decoration-break", &["-webkit-"]),
    ("clip-path", &["-webkit-"]),
    ("hyphens", &["-webkit-", "-ms-"]),
    ("mask-image", &["-webkit-"]),
    ("print-color-adjust", &["-webkit-"]),
    ("tab-size", &["-moz-"]),
    ("text-size-adjust", &["-webkit-", "-moz-", "-ms-"]),
    ("user-select", &["-webkit-", "-moz-", "-ms-"]),
];

/// Prefixed values that need their own declaration.
const VALUES: &[(&str, &str, &str)] = &[
    ("position", "sticky", "-webkit-sticky"),
    ("background-clip", "text", "text"),
];

/// Insert prefixed declarations before their unprefixed counterpart. A
/// prefixed declaration already present in the same block is not
/// duplicated.
pub fn prefix(sheet: &mut Stylesheet) {
    prefix_nodes(&mut sheet.nodes);
}

fn prefix_nodes(nodes: &mut Vec<Node>) {
    let existing: Vec<(String, String)> = nodes
        .iter()
        .filter_map(|n| match n {
            Node::Declaration(d) => Some((d.property.clone(), d.value.clone())),
            _ => None,
        })
        .collect();

    let mut out = Vec::with_capacity(nodes.len());
    for mut node in nodes.drain(..) {
        match &mut node {
            Node::Rule(rule) => prefix_nodes(&mut rule.nodes),
            Node::AtRule(at) => {
                if let Some(children) = at.nodes.as_mut() {
                    prefix_nodes(children);
                }
            }
            Node::Declaration(decl) => {
                for extra in prefixed(decl) {
                    let present = existing
                        .iter()
                        .any(|(p, v)| *p == extra.property && *v == extra.value);
                    if !present {
                        out.push(Node::Declaration(extra));
                    }
                }
            }
            Node::Comment(_) => {}
        }
        out.push(node);
    }
    *nodes = out;
}

fn prefixed(decl: &Declaration) -> Vec<Declaration> {
    let mut extra = Vec::new();
    if let Some((_, prefixes)) = PROPERTIES.iter().find(|(p, _)| *p == decl.property) {
        for prefix in *prefixes {
            extra.push(Declaration {
                property: format!("{prefix}{}", decl.property),
                value: decl.value.clone(),
                important: decl.important,
            });
        }
    }
    for (property, value, replacement) in VALUES {
        if decl.property == *property && decl.value.eq_ignore_ascii_case(value) {
            let (property, value) = if property == &"position" {
                (decl.property.clone(), replacement.to_string())
            } else {
                (
                    format!("-webkit-{}", decl.property),
                    replacement.to_string(),
                )
            };
            extra.push(Declaration {
                property,
                value,
                important: decl.important,
            });
        }
    }
    extra
}
