// src/transform/css/parser.rs

//! A small CSS parser: rules, at-rules (with or without a block),
//! declarations and comments. Errors carry the 1-based line number.

use super::CssError;
use super::ast::{AtRule, Declaration, Node, Rule, Stylesheet};

pub fn parse(source: &str) -> Result<Stylesheet, CssError> {
    let mut parser = Parser {
        chars: source.chars().collect(),
        pos: 0,
        line: 1,
    };
    // Byte-order mark.
    if parser.peek() == Some('\u{feff}') {
        parser.bump();
    }
    let nodes = parser.block(None)?;
    Ok(Stylesheet::new(nodes))
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

enum End {
    Semicolon,
    Open,
    Close,
    Eof,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Parse nodes until the closing brace of a block opened on `opened_at`,
    /// or until end of input at top level.
    fn block(&mut self, opened_at: Option<usize>) -> Result<Vec<Node>, CssError> {
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return match opened_at {
                        Some(line) => Err(CssError::UnclosedBlock { line }),
                        None => Ok(nodes),
                    };
                }
                Some('}') => {
                    if opened_at.is_none() {
                        return Err(CssError::UnexpectedBrace { line: self.line });
                    }
                    self.bump();
                    return Ok(nodes);
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    nodes.push(Node::Comment(self.comment()?));
                }
                Some(_) => {
                    if let Some(node) = self.statement()? {
                        nodes.push(node);
                    }
                }
            }
        }
    }

    fn comment(&mut self) -> Result<String, CssError> {
        let line = self.line;
        let mut text = String::from("/*");
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                None => return Err(CssError::UnterminatedComment { line }),
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    text.push_str("*/");
                    return Ok(text);
                }
                Some(c) => text.push(c),
            }
        }
    }

    fn statement(&mut self) -> Result<Option<Node>, CssError> {
        let line = self.line;
        let (text, end) = self.prelude()?;
        let text = text.trim().to_string();

        match end {
            End::Open => {
                let children = self.block(Some(line))?;
                if let Some(at) = text.strip_prefix('@') {
                    let (name, params) = split_at_rule(at);
                    Ok(Some(Node::AtRule(AtRule::block(name, params, children))))
                } else {
                    Ok(Some(Node::Rule(Rule::new(collapse_ws(&text), children))))
                }
            }
            End::Semicolon | End::Close | End::Eof => {
                if text.is_empty() {
                    return Ok(None);
                }
                if let Some(at) = text.strip_prefix('@') {
                    let (name, params) = split_at_rule(at);
                    return Ok(Some(Node::AtRule(AtRule {
                        name,
                        params,
                        nodes: None,
                    })));
                }
                declaration(&text, line).map(|d| Some(Node::Declaration(d)))
            }
        }
    }

    /// Read up to the next top-level `;`, `{` or `}`. The terminator is
    /// consumed except for `}`.
    fn prelude(&mut self) -> Result<(String, End), CssError> {
        let mut text = String::new();
        let mut parens = 0usize;
        loop {
            let Some(c) = self.peek() else {
                return Ok((text, End::Eof));
            };
            match c {
                '"' | '\'' => self.string(c, &mut text)?,
                '/' if self.peek_at(1) == Some('*') => {
                    // Comments inside a prelude or value are dropped.
                    self.comment()?;
                    text.push(' ');
                }
                '\\' => {
                    text.push(c);
                    self.bump();
                    if let Some(next) = self.bump() {
                        text.push(next);
                    }
                }
                '(' => {
                    parens += 1;
                    text.push(c);
                    self.bump();
                }
                ')' => {
                    parens = parens.saturating_sub(1);
                    text.push(c);
                    self.bump();
                }
                ';' if parens == 0 => {
                    self.bump();
                    return Ok((text, End::Semicolon));
                }
                '{' if parens == 0 => {
                    self.bump();
                    return Ok((text, End::Open));
                }
                '}' if parens == 0 => return Ok((text, End::Close)),
                _ => {
                    text.push(c);
                    self.bump();
                }
            }
        }
    }

    fn string(&mut self, quote: char, out: &mut String) -> Result<(), CssError> {
        let line = self.line;
        out.push(quote);
        self.bump();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(CssError::UnterminatedString { line }),
                Some('\\') => {
                    out.push('\\');
                    if let Some(next) = self.bump() {
                        out.push(next);
                    }
                }
                Some(c) if c == quote => {
                    out.push(c);
                    return Ok(());
                }
                Some(c) => out.push(c),
            }
        }
    }
}

fn split_at_rule(text: &str) -> (String, String) {
    let end = text
        .find(|c: char| c.is_whitespace() || c == '(' || c == '"' || c == '\'')
        .unwrap_or(text.len());
    let name = text[..end].to_ascii_lowercase();
    let params = collapse_ws(text[end..].trim());
    (name, params)
}

fn declaration(text: &str, line: usize) -> Result<Declaration, CssError> {
    let Some(colon) = text.find(':') else {
        return Err(CssError::InvalidDeclaration {
            line,
            text: text.to_string(),
        });
    };
    let property = text[..colon].trim();
    if property.is_empty() || property.contains(char::is_whitespace) {
        return Err(CssError::InvalidDeclaration {
            line,
            text: text.to_string(),
        });
    }
    let mut value = text[colon + 1..].trim().to_string();
    let mut important = false;
    if let Some(bang) = value.rfind('!') {
        if value[bang + 1..].trim().eq_ignore_ascii_case("important") {
            important = true;
            value = value[..bang].trim_end().to_string();
        }
    }
    Ok(Declaration {
        property: if property.starts_with("--") {
            property.to_string()
        } else {
            property.to_ascii_lowercase()
        },
        value,
        important,
    })
}

/// Collapse whitespace runs outside strings to a single space.
pub(crate) fn collapse_ws(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut space = false;
    for c in text.trim().chars() {
        match quote {
            Some(q) => {
                out.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c.is_whitespace() => {
                if !space {
                    out.push(' ');
                }
                space = true;
                continue;
            }
            None => {
                if c == '"' || c == '\'' {
                    quote = Some(c);
                }
                out.push(c);
            }
        }
        space = false;
    }
    out
}
