// src/transform/css/ast.rs

use std::fmt::Write as _;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Rule(Rule),
    AtRule(AtRule),
    Declaration(Declaration),
    /// Full comment text including the delimiters.
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// Name without the `@`.
    pub name: String,
    pub params: String,
    /// `None` for statements such as `@import "x.css";`.
    pub nodes: Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Rule {
    pub fn new(selector: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            selector: selector.into(),
            nodes,
        }
    }

    /// Top-level selectors of a selector list.
    pub fn selectors(&self) -> Vec<String> {
        split_top_level(&self.selector, ',')
    }
}

impl AtRule {
    pub fn block(name: impl Into<String>, params: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            nodes: Some(nodes),
        }
    }
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important: false,
        }
    }
}

impl Node {
    pub fn decl(property: &str, value: &str) -> Node {
        Node::Declaration(Declaration::new(property, value))
    }
}

impl Stylesheet {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Readable output: one declaration per line, two-space indent, a blank
    /// line between top-level blocks.
    pub fn to_pretty(&self) -> String {
        let mut out = String::new();
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            write_pretty(&mut out, node, 0);
        }
        out
    }
}

fn write_pretty(out: &mut String, node: &Node, level: usize) {
    let pad = "  ".repeat(level);
    match node {
        Node::Comment(text) => {
            let _ = writeln!(out, "{pad}{text}");
        }
        Node::Declaration(d) => {
            let important = if d.important { " !important" } else { "" };
            let _ = writeln!(out, "{pad}{}: {}{important};", d.property, d.value);
        }
        Node::Rule(rule) => {
            let selectors = rule.selectors().join(",\n");
            let selectors = selectors.replace('\n', &format!("\n{pad}"));
            let _ = writeln!(out, "{pad}{selectors} {{");
            for child in &rule.nodes {
                write_pretty(out, child, level + 1);
            }
            let _ = writeln!(out, "{pad}}}");
        }
        Node::AtRule(at) => {
            let head = if at.params.is_empty() {
                format!("@{}", at.name)
            } else {
                format!("@{} {}", at.name, at.params)
            };
            match &at.nodes {
                None => {
                    let _ = writeln!(out, "{pad}{head};");
                }
                Some(children) => {
                    let _ = writeln!(out, "{pad}{head} {{");
                    for (i, child) in children.iter().enumerate() {
                        if i > 0 && level == 0 && matches!(child, Node::Rule(_) | Node::AtRule(_)) {
                            out.push('\n');
                        }
                        write_pretty(out, child, level + 1);
                    }
                    let _ = writeln!(out, "{pad}}}");
                }
            }
        }
    }
}

/// Split on `sep` outside of parentheses, brackets and strings; pieces are
/// trimmed and empty pieces dropped.
pub fn split_top_level(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut current = String::new();
    let mut escaped = false;

    for c in s.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match quote {
            Some(q) => {
                if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                current.push(c);
            }
            None => match c {
                '\\' => {
                    escaped = true;
                    current.push(c);
                }
                '"' | '\'' => {
                    quote = Some(c);
                    current.push(c);
                }
                '(' | '[' => {
                    depth += 1;
                    current.push(c);
                }
                ')' | ']' => {
                    depth -= 1;
                    current.push(c);
                }
                c if c == sep && depth == 0 => {
                    let piece = current.trim();
                    if !piece.is_empty() {
                        parts.push(piece.to_string());
                    }
                    current.clear();
                }
                _ => current.push(c),
            },
        }
    }
    let piece = current.trim();
    if !piece.is_empty() {
        parts.push(piece.to_string());
    }
    parts
}
