// src/transform/css/minify.rs

//! Conservative minification.
//!
//! Comments are dropped unless they start with `/*!`. Whitespace is collapsed,
//! the last semicolon of a block is dropped, zero lengths lose their unit,
//! leading zeros are removed and six-digit hex colours are shortened where
//! possible. Numeric values such as `z-index` are never rewritten.

use super::ast::{Node, Stylesheet};

pub fn minify(sheet: &Stylesheet) -> String {
    let mut out = String::new();
    write_nodes(&mut out, &sheet.nodes);
    out
}

fn write_nodes(out: &mut String, nodes: &[Node]) {
    let mut first_decl = true;
    for node in nodes {
        match node {
            Node::Comment(text) => {
                if text.starts_with("/*!") {
                    out.push_str(text);
                }
            }
            Node::Declaration(d) => {
                if !first_decl {
                    out.push(';');
                }
                first_decl = false;
                out.push_str(&d.property);
                out.push(':');
                out.push_str(&minify_value(&d.property, &d.value));
                if d.important {
                    out.push_str("!important");
                }
            }
            Node::Rule(rule) => {
                if rule.nodes.iter().all(|n| matches!(n, Node::Comment(_))) {
                    continue;
                }
                close_decls(out, &mut first_decl);
                out.push_str(&minify_selector(&rule.selector));
                out.push('{');
                write_nodes(out, &rule.nodes);
                out.push('}');
            }
            Node::AtRule(at) => {
                close_decls(out, &mut first_decl);
                out.push('@');
                out.push_str(&at.name);
                if !at.params.is_empty() {
                    out.push(' ');
                    out.push_str(&minify_params(&at.params));
                }
                match &at.nodes {
                    None => out.push(';'),
                    Some(children) => {
                        out.push('{');
                        write_nodes(out, children);
                        out.push('}');
                    }
                }
            }
        }
    }
}

/// A rule following declarations in the same block needs a separator.
fn close_decls(out: &mut String, first_decl: &mut bool) {
    if !*first_decl {
        out.push(';');
        *first_decl = true;
    }
}

fn minify_selector(selector: &str) -> String {
    let mut out = String::with_capacity(selector.len());
    let mut quote: Option<char> = None;
    let mut pending_space = false;
    let mut chars = selector.trim().chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(n) = chars.next() {
                    out.push(n);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\\' => {
                flush_space(&mut out, &mut pending_space);
                out.push(c);
                if let Some(n) = chars.next() {
                    out.push(n);
                    // A hex escape may be terminated by a single space which
                    // must be kept.
                    if n.is_ascii_hexdigit() {
                        while let Some(&h) = chars.peek() {
                            if h.is_ascii_hexdigit() {
                                out.push(h);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                        if chars.peek() == Some(&' ') {
                            out.push(' ');
                            chars.next();
                        }
                    }
                }
            }
            '"' | '\'' => {
                flush_space(&mut out, &mut pending_space);
                quote = Some(c);
                out.push(c);
            }
            c if c.is_whitespace() => pending_space = true,
            '>' | '+' | '~' | ',' => {
                pending_space = false;
                out.push(c);
                while chars.peek().is_some_and(|n| n.is_whitespace()) {
                    chars.next();
                }
            }
            _ => {
                flush_space(&mut out, &mut pending_space);
                out.push(c);
            }
        }
    }
    out
}

fn flush_space(out: &mut String, pending: &mut bool) {
    if *pending && !out.is_empty() {
        out.push(' ');
    }
    *pending = false;
}

fn minify_params(params: &str) -> String {
    params
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(": ", ":")
}

const UNITS: &[&str] = &[
    "px", "em", "rem", "ex", "ch", "vw", "vh", "vmin", "vmax", "cm", "mm", "in", "pt", "pc",
];

fn minify_value(property: &str, value: &str) -> String {
    if property.starts_with("--") {
        return value.trim().to_string();
    }

    // String literals and url() bodies are copied verbatim; only the rest is
    // rewritten.
    let mut out = String::with_capacity(value.len());
    let mut plain = String::new();
    let mut parens = Vec::new();
    let mut chars = value.trim().chars();
    while let Some(c) = chars.next() {
        if c == '(' && plain.to_ascii_lowercase().ends_with("url") {
            out.push_str(&minify_plain(&plain, &mut parens));
            plain.clear();
            out.push(c);
            for s in chars.by_ref() {
                out.push(s);
                if s == ')' {
                    break;
                }
            }
        } else if c == '"' || c == '\'' {
            out.push_str(&minify_plain(&plain, &mut parens));
            plain.clear();
            out.push(c);
            for s in chars.by_ref() {
                out.push(s);
                if s == c {
                    break;
                }
            }
        } else {
            plain.push(c);
        }
    }
    out.push_str(&minify_plain(&plain, &mut parens));
    out
}

const MATH_FUNCTIONS: &[&str] = &["calc", "min", "max", "clamp"];

/// Plain text between verbatim pieces; a space touching a string or `url()`
/// survives as one space unless a comma or parenthesis makes it redundant.
///
/// `parens` carries the open parenthesis stack across pieces; an entry is
/// true when it sits inside a math function, where `0px` must keep its unit.
fn minify_plain(text: &str, parens: &mut Vec<bool>) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let collapsed = collapsed.replace(", ", ",").replace(" ,", ",");
    let mut tokens: Vec<String> = Vec::new();
    for token in split_keep(&collapsed) {
        match token.as_str() {
            "(" => {
                let function = tokens.last().map(|t| t.to_ascii_lowercase());
                let math = parens.last().copied().unwrap_or(false)
                    || function.is_some_and(|f| MATH_FUNCTIONS.contains(&f.as_str()));
                parens.push(math);
                tokens.push(token);
            }
            ")" => {
                parens.pop();
                tokens.push(token);
            }
            _ => {
                let in_math = parens.last().copied().unwrap_or(false);
                tokens.push(shorten_token(&token, in_math));
            }
        }
    }
    let core = tokens.concat();
    if core.is_empty() {
        return if text.is_empty() {
            String::new()
        } else {
            " ".to_string()
        };
    }

    let lead = text.starts_with(char::is_whitespace) && !core.starts_with([',', ')']);
    let trail = text.ends_with(char::is_whitespace) && !core.ends_with([',', '(']);
    format!(
        "{}{core}{}",
        if lead { " " } else { "" },
        if trail { " " } else { "" }
    )
}

/// Split into word tokens and single separator characters.
fn split_keep(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c == ' ' || c == ',' || c == '(' || c == ')' || c == '/' {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            tokens.push(c.to_string());
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn shorten_token(token: &str, keep_units: bool) -> String {
    if let Some(hex) = token.strip_prefix('#') {
        return shorten_hex(hex);
    }

    let (sign, body) = match token.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", token),
    };

    let number_len = body
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(body.len());
    if number_len == 0 {
        return token.to_string();
    }
    let (number, unit) = body.split_at(number_len);
    let Ok(parsed) = number.parse::<f64>() else {
        return token.to_string();
    };

    if parsed == 0.0 && !keep_units && UNITS.contains(&unit) {
        return "0".to_string();
    }

    let number = if let Some(frac) = number.strip_prefix("0.") {
        format!(".{frac}")
    } else {
        number.to_string()
    };
    format!("{sign}{number}{unit}")
}

fn shorten_hex(hex: &str) -> String {
    let lower = hex.to_ascii_lowercase();
    if lower.len() == 6 && lower.chars().all(|c| c.is_ascii_hexdigit()) {
        let b = lower.as_bytes();
        if b[0] == b[1] && b[2] == b[3] && b[4] == b[5] {
            return format!("#{}{}{}", b[0] as char, b[2] as char, b[4] as char);
        }
    }
    format!("#{lower}")
}
