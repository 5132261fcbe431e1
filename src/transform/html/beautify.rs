// src/transform/html/beautify.rs

//! HTML re-indentation.
//!
//! Block elements go on their own line, one level deeper than their parent.
//! Inline elements and text stay on the current line with whitespace
//! collapsed. `<pre>` and `<textarea>` keep their content verbatim and
//! `<script>`/`<style>` bodies are re-indented as a unit.

use super::HtmlOptions;

const INLINE: &[&str] = &[
    "a", "abbr", "acronym", "area", "audio", "b", "bdi", "bdo", "big", "br", "button", "canvas",
    "cite", "code", "data", "datalist", "del", "dfn", "em", "embed", "i", "iframe", "img", "input",
    "ins", "kbd", "label", "map", "mark", "math", "meter", "noscript", "object", "output",
    "progress", "q", "ruby", "s", "samp", "select", "small", "span", "strike", "strong", "sub",
    "sup", "svg", "template", "textarea", "time", "tt", "u", "var", "video", "wbr",
];

const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW: &[&str] = &["script", "style", "pre", "textarea"];

#[derive(Debug)]
enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    Directive(String),
}

#[derive(Debug)]
struct Element {
    name: String,
    open: String,
    children: Vec<Node>,
    body: Option<String>,
    close: Option<String>,
}

impl Element {
    fn leaf(name: String, open: String) -> Self {
        Self {
            name,
            open,
            children: Vec::new(),
            body: None,
            close: None,
        }
    }
}

pub fn beautify(html: &str, opts: &HtmlOptions) -> String {
    let nodes = parse(html);
    let mut printer = Printer {
        lines: Vec::new(),
        unit: " ".repeat(opts.indent_size),
        max_blank: opts.max_preserve_newlines,
    };
    printer.children(&nodes, 0);

    let mut out = printer.lines.join("\n");
    out.push('\n');
    out
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn parse(html: &str) -> Vec<Node> {
    let mut roots: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    fn push(stack: &mut [Element], roots: &mut Vec<Node>, node: Node) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }

    let mut i = 0;
    while i < html.len() {
        let rest = &html[i..];
        if !rest.starts_with('<') {
            let end = rest.find('<').unwrap_or(rest.len());
            push(&mut stack, &mut roots, Node::Text(rest[..end].to_string()));
            i += end;
            continue;
        }

        if rest.starts_with("<!--") {
            let end = rest.find("-->").map(|e| e + 3).unwrap_or(rest.len());
            push(
                &mut stack,
                &mut roots,
                Node::Comment(rest[..end].to_string()),
            );
            i += end;
            continue;
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = rest.find('>').map(|e| e + 1).unwrap_or(rest.len());
            push(
                &mut stack,
                &mut roots,
                Node::Directive(rest[..end].to_string()),
            );
            i += end;
            continue;
        }

        if let Some(after) = rest.strip_prefix("</") {
            if after.starts_with(|c: char| c.is_ascii_alphabetic()) {
                let end = rest.find('>').map(|e| e + 1).unwrap_or(rest.len());
                let name = tag_name(&rest[2..end]);
                close(&mut stack, &mut roots, &name, &rest[..end]);
                i += end;
                continue;
            }
        }

        if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            let end = tag_end(rest);
            let open = &rest[..end];
            let name = tag_name(&open[1..]);
            i += end;

            if RAW.contains(&name.as_str()) {
                let body_rest = &html[i..];
                let needle = format!("</{name}");
                let body_end = find_ci(body_rest, &needle).unwrap_or(body_rest.len());
                let close_end = body_rest[body_end..]
                    .find('>')
                    .map(|e| body_end + e + 1)
                    .unwrap_or(body_rest.len());
                let el = Element {
                    name,
                    open: open.to_string(),
                    children: Vec::new(),
                    body: Some(body_rest[..body_end].to_string()),
                    close: Some(body_rest[body_end..close_end].to_string())
                        .filter(|c| !c.is_empty()),
                };
                push(&mut stack, &mut roots, Node::Element(el));
                i += close_end;
            } else if VOID.contains(&name.as_str()) || open.ends_with("/>") {
                push(
                    &mut stack,
                    &mut roots,
                    Node::Element(Element::leaf(name, open.to_string())),
                );
            } else {
                stack.push(Element::leaf(name, open.to_string()));
            }
            continue;
        }

        // A lone '<' that does not start a tag.
        push(&mut stack, &mut roots, Node::Text("<".to_string()));
        i += 1;
    }

    while let Some(el) = stack.pop() {
        push(&mut stack, &mut roots, Node::Element(el));
    }
    roots
}

fn close(stack: &mut Vec<Element>, roots: &mut Vec<Node>, name: &str, raw: &str) {
    let Some(pos) = stack.iter().rposition(|el| el.name == name) else {
        // Stray end tag.
        return;
    };
    while stack.len() > pos + 1 {
        if let Some(el) = stack.pop() {
            attach(stack, roots, el);
        }
    }
    if let Some(mut el) = stack.pop() {
        el.close = Some(raw.to_string());
        attach(stack, roots, el);
    }
}

fn attach(stack: &mut [Element], roots: &mut Vec<Node>, el: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(el)),
        None => roots.push(Node::Element(el)),
    }
}

fn tag_name(s: &str) -> String {
    s.chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == ':' || *c == '_')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Offset just past the `>` closing a start tag, skipping quoted values.
fn tag_end(s: &str) -> usize {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return i + 1,
            None => {}
        }
    }
    s.len()
}

fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.to_ascii_lowercase();
    hay.find(&needle.to_ascii_lowercase())
}

// ---------------------------------------------------------------------------
// Printing
// ---------------------------------------------------------------------------

struct Printer {
    lines: Vec<String>,
    unit: String,
    max_blank: usize,
}

impl Printer {
    fn line(&mut self, level: usize, text: &str) {
        let text = text.trim_end();
        self.lines
            .push(format!("{}{}", self.unit.repeat(level), text));
    }

    fn blank(&mut self, count: usize) {
        if self.lines.is_empty() {
            return;
        }
        for _ in 0..count.min(self.max_blank) {
            self.lines.push(String::new());
        }
    }

    fn children(&mut self, nodes: &[Node], level: usize) {
        let mut inline = String::new();
        let mut pending_blank = 0;

        for node in nodes {
            match node {
                Node::Text(t) if t.trim().is_empty() => {
                    if inline.is_empty() {
                        pending_blank = t.matches('\n').count().saturating_sub(1);
                    } else if !t.is_empty() {
                        inline.push(' ');
                    }
                }
                n if !is_block(n) => {
                    pending_blank = 0;
                    inline.push_str(&render_inline(n));
                }
                n => {
                    self.flush(&mut inline, level);
                    self.blank(pending_blank);
                    pending_blank = 0;
                    self.block(n, level);
                }
            }
        }
        self.flush(&mut inline, level);
    }

    fn flush(&mut self, inline: &mut String, level: usize) {
        let text = inline.trim();
        if !text.is_empty() {
            let text = text.to_string();
            self.line(level, &text);
        }
        inline.clear();
    }

    fn block(&mut self, node: &Node, level: usize) {
        let el = match node {
            Node::Element(el) => el,
            Node::Comment(c) => return self.line(level, c.trim()),
            Node::Directive(d) => return self.line(level, d.trim()),
            Node::Text(t) => return self.line(level, &collapse(t)),
        };

        let close = el.close.as_deref().unwrap_or("");

        if let Some(body) = &el.body {
            if el.name == "pre" || el.name == "textarea" {
                self.line(level, &format!("{}{}{}", el.open, body, close));
            } else if body.trim().is_empty() {
                self.line(level, &format!("{}{}", el.open, close));
            } else {
                self.line(level, &el.open);
                for line in dedent(body) {
                    self.line(level + 1, &line);
                }
                self.line(level, close);
            }
            return;
        }

        if el.children.iter().all(|c| !is_block(c)) {
            let inner: String = el.children.iter().map(render_inline).collect();
            let inner = inner.trim();
            self.line(level, &format!("{}{}{}", el.open, inner, close));
            return;
        }

        self.line(level, &el.open);
        self.children(&el.children, level + 1);
        if !close.is_empty() {
            self.line(level, close);
        }
    }
}

fn is_block(node: &Node) -> bool {
    match node {
        Node::Text(_) => false,
        Node::Comment(_) | Node::Directive(_) => true,
        Node::Element(el) => {
            if !INLINE.contains(&el.name.as_str()) {
                return true;
            }
            el.children.iter().any(is_block)
        }
    }
}

fn render_inline(node: &Node) -> String {
    match node {
        Node::Text(t) => collapse(t),
        Node::Comment(c) | Node::Directive(c) => c.clone(),
        Node::Element(el) => {
            let mut s = el.open.clone();
            match &el.body {
                Some(body) => s.push_str(body),
                None => {
                    for child in &el.children {
                        s.push_str(&render_inline(child));
                    }
                }
            }
            if let Some(close) = &el.close {
                s.push_str(close);
            }
            s
        }
    }
}

/// Collapse whitespace runs to single spaces, keeping a leading and trailing
/// space when the original had one.
fn collapse(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Non-blank lines of `body` with their common indentation removed.
fn dedent(body: &str) -> Vec<String> {
    let lines: Vec<&str> = body.lines().filter(|l| !l.trim().is_empty()).collect();
    let common = lines
        .iter()
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| {
            let cut = l
                .char_indices()
                .nth(common)
                .map(|(i, _)| i)
                .unwrap_or(l.len());
            l[cut..].trim_end().to_string()
        })
        .collect()
}
