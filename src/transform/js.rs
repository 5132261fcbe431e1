// src/transform/js.rs

//! JSMin-style minification.
//!
//! Comments are removed and whitespace is reduced to what is needed to keep
//! tokens apart. String, template and regular-expression literals pass
//! through untouched.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum JsError {
    #[error("line {line}: unterminated comment")]
    UnterminatedComment { line: usize },

    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },

    #[error("line {line}: unterminated regular expression set")]
    UnterminatedSet { line: usize },

    #[error("line {line}: unterminated regular expression literal")]
    UnterminatedRegex { line: usize },
}

pub fn minify(source: &str) -> Result<String, JsError> {
    let mut m = Minifier {
        input: source.chars().collect(),
        pos: 0,
        line: 1,
        lookahead: None,
        out: String::with_capacity(source.len()),
        a: '\n',
        b: EOF,
        x: EOF,
        y: EOF,
    };
    m.run()?;
    Ok(m.out.trim_start_matches('\n').to_string())
}

const EOF: char = '\0';

struct Minifier {
    input: Vec<char>,
    pos: usize,
    line: usize,
    lookahead: Option<char>,
    out: String,
    a: char,
    b: char,
    x: char,
    y: char,
}

fn is_alphanum(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '\\' || (c as u32) > 126
}

impl Minifier {
    fn raw(&mut self) -> char {
        match self.input.get(self.pos) {
            Some(&c) => {
                self.pos += 1;
                if c == '\n' {
                    self.line += 1;
                }
                c
            }
            None => EOF,
        }
    }

    /// Next character with control characters folded: `\r` becomes `\n`,
    /// other control characters become a space.
    fn get(&mut self) -> char {
        let c = match self.lookahead.take() {
            Some(c) => c,
            None => self.raw(),
        };
        if c >= ' ' || c == '\n' || c == EOF {
            c
        } else if c == '\r' {
            '\n'
        } else {
            ' '
        }
    }

    fn peek(&mut self) -> char {
        let c = self.get();
        self.lookahead = Some(c);
        c
    }

    /// Next character, skipping comments. Remembers the last two characters
    /// it returned.
    fn next(&mut self) -> Result<char, JsError> {
        let c = self.skip_comments()?;
        self.y = self.x;
        self.x = c;
        Ok(c)
    }

    fn skip_comments(&mut self) -> Result<char, JsError> {
        let c = self.get();
        if c != '/' {
            return Ok(c);
        }
        match self.peek() {
            '/' => loop {
                let c = self.get();
                if c == '\n' || c == EOF {
                    return Ok(c);
                }
            },
            '*' => {
                let line = self.line;
                self.get();
                loop {
                    match self.get() {
                        '*' if self.peek() == '/' => {
                            self.get();
                            return Ok(' ');
                        }
                        EOF => return Err(JsError::UnterminatedComment { line }),
                        _ => {}
                    }
                }
            }
            _ => Ok(c),
        }
    }

    fn put(&mut self, c: char) {
        if c != EOF {
            self.out.push(c);
        }
    }

    /// 1: output A, copy B to A, get next B.
    /// 2: copy B to A, get next B (deletes A).
    /// 3: get next B (deletes B).
    fn action(&mut self, d: u8) -> Result<(), JsError> {
        if d <= 1 {
            self.put(self.a);
            if (self.y == '\n' || self.y == ' ')
                && matches!(self.a, '+' | '-' | '*' | '/')
                && matches!(self.b, '+' | '-' | '*' | '/')
            {
                self.put(self.y);
            }
        }
        if d <= 2 {
            self.a = self.b;
            if matches!(self.a, '\'' | '"' | '`') {
                let line = self.line;
                loop {
                    self.put(self.a);
                    self.a = self.get();
                    if self.a == self.b {
                        break;
                    }
                    if self.a == '\\' {
                        self.put(self.a);
                        self.a = self.get();
                    }
                    if self.a == EOF {
                        return Err(JsError::UnterminatedString { line });
                    }
                }
            }
        }
        self.b = self.next()?;
        if self.b == '/'
            && matches!(
                self.a,
                '(' | ','
                    | '='
                    | ':'
                    | '['
                    | '!'
                    | '&'
                    | '|'
                    | '?'
                    | '+'
                    | '-'
                    | '~'
                    | '*'
                    | '/'
                    | '{'
                    | '}'
                    | ';'
                    | '\n'
            )
        {
            self.regex()?;
        }
        Ok(())
    }

    fn regex(&mut self) -> Result<(), JsError> {
        let line = self.line;
        self.put(self.a);
        if self.a == '/' || self.a == '*' {
            self.put(' ');
        }
        self.put(self.b);
        loop {
            self.a = self.get();
            if self.a == '[' {
                loop {
                    self.put(self.a);
                    self.a = self.get();
                    if self.a == ']' {
                        break;
                    }
                    if self.a == '\\' {
                        self.put(self.a);
                        self.a = self.get();
                    }
                    if self.a == EOF {
                        return Err(JsError::UnterminatedSet { line });
                    }
                }
            } else if self.a == '/' {
                if matches!(self.peek(), '/' | '*') {
                    return Err(JsError::UnterminatedRegex { line });
                }
                break;
            } else if self.a == '\\' {
                self.put(self.a);
                self.a = self.get();
            }
            if self.a == EOF {
                return Err(JsError::UnterminatedRegex { line });
            }
            self.put(self.a);
        }
        self.b = self.next()?;
        Ok(())
    }

    fn run(&mut self) -> Result<(), JsError> {
        if self.peek() == '\u{feff}' {
            self.get();
        }
        self.action(3)?;
        while self.a != EOF {
            match self.a {
                ' ' => self.action(if is_alphanum(self.b) { 1 } else { 2 })?,
                '\n' => match self.b {
                    '{' | '[' | '(' | '+' | '-' | '!' | '~' => self.action(1)?,
                    ' ' => self.action(3)?,
                    _ => self.action(if is_alphanum(self.b) { 1 } else { 2 })?,
                },
                _ => match self.b {
                    ' ' => self.action(if is_alphanum(self.a) { 1 } else { 3 })?,
                    '\n' => match self.a {
                        '}' | ']' | ')' | '+' | '-' | '"' | '\'' | '`' => self.action(1)?,
                        _ => self.action(if is_alphanum(self.a) { 1 } else { 3 })?,
                    },
                    _ => self.action(1)?,
                },
            }
        }
        Ok(())
    }
}
