// src/transform/svg/xml.rs

//! Minimal XML tree for SVG documents. Text and attribute values are kept
//! as written (entities are not decoded) so serialising is lossless.

use super::SvgError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
    /// `<?xml ...?>` and other processing instructions.
    Instruction(String),
    Doctype(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attr {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|a| a.name != name);
    }

    /// Visit this element and all descendants, parents first.
    pub fn walk(&self, f: &mut impl FnMut(&Element)) {
        f(self);
        for child in &self.children {
            if let Node::Element(el) = child {
                el.walk(f);
            }
        }
    }

    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(el) = child {
                el.walk_mut(f);
            }
        }
    }

    pub fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for attr in &self.attrs {
            out.push(' ');
            out.push_str(&attr.name);
            out.push_str("=\"");
            out.push_str(&attr.value);
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl Node {
    pub fn write(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.write(out),
            Node::Text(t) => out.push_str(t),
            Node::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
            Node::CData(c) => {
                out.push_str("<![CDATA[");
                out.push_str(c);
                out.push_str("]]>");
            }
            Node::Instruction(i) => {
                out.push_str("<?");
                out.push_str(i);
                out.push_str("?>");
            }
            Node::Doctype(d) => {
                out.push_str("<!");
                out.push_str(d);
                out.push('>');
            }
        }
    }
}

impl Document {
    pub fn parse(text: &str) -> Result<Document, SvgError> {
        let mut parser = Parser {
            src: text.trim_start_matches('\u{feff}'),
            pos: 0,
        };
        let nodes = parser.parse()?;
        let doc = Document { nodes };
        if doc.root().is_none() {
            return Err(SvgError::NoRoot);
        }
        Ok(doc)
    }

    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(|n| match n {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.nodes.iter_mut().find_map(|n| match n {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write(&mut out);
        }
        out
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn line(&self) -> usize {
        self.src[..self.pos].matches('\n').count() + 1
    }

    fn err(&self, reason: impl Into<String>) -> SvgError {
        SvgError::Syntax {
            line: self.line(),
            reason: reason.into(),
        }
    }

    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    /// Consume up to and including `end`, returning the text before it.
    fn until(&mut self, end: &str, what: &str) -> Result<String, SvgError> {
        match self.rest().find(end) {
            Some(i) => {
                let body = self.rest()[..i].to_string();
                self.pos += i + end.len();
                Ok(body)
            }
            None => Err(self.err(format!("unterminated {what}"))),
        }
    }

    fn parse(&mut self) -> Result<Vec<Node>, SvgError> {
        let mut roots: Vec<Node> = Vec::new();
        let mut stack: Vec<Element> = Vec::new();

        while self.pos < self.src.len() {
            let rest = self.rest();
            let node = if rest.starts_with("<?") {
                self.pos += 2;
                Node::Instruction(self.until("?>", "processing instruction")?)
            } else if rest.starts_with("<!--") {
                self.pos += 4;
                Node::Comment(self.until("-->", "comment")?)
            } else if rest.starts_with("<![CDATA[") {
                self.pos += 9;
                Node::CData(self.until("]]>", "CDATA section")?)
            } else if rest.starts_with("<!") {
                self.pos += 2;
                Node::Doctype(self.doctype()?)
            } else if rest.starts_with("</") {
                self.pos += 2;
                let name = self.until(">", "end tag")?.trim().to_string();
                let Some(el) = stack.pop() else {
                    return Err(self.err(format!("unexpected </{name}>")));
                };
                if el.name != name {
                    return Err(SvgError::MismatchedTag {
                        line: self.line(),
                        expected: el.name,
                        found: name,
                    });
                }
                Node::Element(el)
            } else if rest.starts_with('<') {
                self.pos += 1;
                let (el, self_closing) = self.start_tag()?;
                if !self_closing {
                    stack.push(el);
                    continue;
                }
                Node::Element(el)
            } else {
                let end = rest.find('<').unwrap_or(rest.len());
                let text = rest[..end].to_string();
                self.pos += end;
                Node::Text(text)
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => roots.push(node),
            }
        }

        if let Some(open) = stack.pop() {
            return Err(SvgError::Unclosed { name: open.name });
        }
        Ok(roots)
    }

    fn doctype(&mut self) -> Result<String, SvgError> {
        let mut depth = 0usize;
        for (i, c) in self.rest().char_indices() {
            match c {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                '>' if depth == 0 => {
                    let body = self.rest()[..i].to_string();
                    self.pos += i + 1;
                    return Ok(body);
                }
                _ => {}
            }
        }
        Err(self.err("unterminated doctype"))
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn name(&mut self) -> String {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '/' || c == '>' || c == '=')
            .unwrap_or(rest.len());
        let name = rest[..end].to_string();
        self.pos += end;
        name
    }

    fn start_tag(&mut self) -> Result<(Element, bool), SvgError> {
        let name = self.name();
        if name.is_empty() {
            return Err(self.err("empty tag name"));
        }
        let mut el = Element::new(name);
        loop {
            self.skip_ws();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok((el, true));
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Ok((el, false));
            }
            if rest.is_empty() {
                return Err(self.err(format!("unterminated <{}> tag", el.name)));
            }

            let attr_name = self.name();
            if attr_name.is_empty() {
                return Err(self.err(format!("malformed attribute in <{}>", el.name)));
            }
            self.skip_ws();
            if !self.rest().starts_with('=') {
                return Err(self.err(format!("attribute {attr_name} has no value")));
            }
            self.pos += 1;
            self.skip_ws();
            let quote = match self.rest().chars().next() {
                Some(q @ ('"' | '\'')) => q,
                _ => return Err(self.err(format!("attribute {attr_name} value must be quoted"))),
            };
            self.pos += 1;
            let value = self.until(&quote.to_string(), "attribute value")?;
            let value = if quote == '\'' {
                value.replace('"', "&quot;")
            } else {
                value
            };
            el.attrs.push(Attr {
                name: attr_name,
                value,
            });
        }
    }
}
