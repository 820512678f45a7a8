//! Content stream tokenizer.
//!
//! Splits raw content stream bytes into [`Operator`]s, each carrying the
//! [`Operand`]s that preceded it. The same tokenizer reads ToUnicode CMaps,
//! which share the PostScript-like syntax.
//!
//! Parsing is lenient: stray delimiters are skipped, unterminated strings run
//! to the end of input, and inline image data (`BI … ID … EI`) is skipped
//! without producing an operator.

use crate::error::BackendError;

/// A content stream operand value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Integer(i64),
    Real(f64),
    /// Name without the leading `/`, `#xx` escapes decoded.
    Name(String),
    /// Literal `( … )` or hex `< … >` string, as decoded bytes.
    String(Vec<u8>),
    Array(Vec<Operand>),
    Dictionary(Vec<(String, Operand)>),
    Boolean(bool),
    Null,
}

impl Operand {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Integer(i) => Some(*i as f64),
            Operand::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Operand::String(s) => Some(s),
            _ => None,
        }
    }
}

/// An operator with the operands that preceded it.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub name: String,
    pub operands: Vec<Operand>,
}

enum Token {
    Operand(Operand),
    Keyword(String),
    /// `]`, `>>`, `)` or `}` outside of the construct they close.
    Stray,
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' | b'\0')
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(b: u8) -> bool {
    !is_whitespace(b) && !is_delimiter(b)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

impl<'a> Lexer<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(b) = self.peek() {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while let Some(c) = self.peek() {
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, BackendError> {
        self.skip_whitespace_and_comments();
        let Some(b) = self.peek() else {
            return Ok(None);
        };
        let token = match b {
            b'(' => Token::Operand(Operand::String(self.literal_string())),
            b'<' if self.peek_at(1) == Some(b'<') => {
                self.pos += 2;
                Token::Operand(Operand::Dictionary(self.dictionary()?))
            }
            b'<' => Token::Operand(Operand::String(self.hex_string())),
            b'[' => {
                self.pos += 1;
                Token::Operand(Operand::Array(self.array()?))
            }
            b'/' => Token::Operand(Operand::Name(self.name())),
            b'>' if self.peek_at(1) == Some(b'>') => {
                self.pos += 2;
                Token::Stray
            }
            b']' | b')' | b'>' | b'{' | b'}' => {
                self.pos += 1;
                Token::Stray
            }
            b'0'..=b'9' | b'+' | b'-' | b'.' => match self.number() {
                Some(n) => Token::Operand(n),
                None => Token::Stray,
            },
            _ => {
                let word = self.regular_run();
                match word.as_str() {
                    "true" => Token::Operand(Operand::Boolean(true)),
                    "false" => Token::Operand(Operand::Boolean(false)),
                    "null" => Token::Operand(Operand::Null),
                    _ => Token::Keyword(word),
                }
            }
        };
        Ok(Some(token))
    }

    fn regular_run(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_regular) {
            self.pos += 1;
        }
        if self.pos == start {
            // a lone delimiter we have no use for
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    fn number(&mut self) -> Option<Operand> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.'))
        {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.input[start..self.pos]).ok()?;
        if text.contains('.') {
            // "-.5", "3." and friends; a malformed run like "1.2.3" is dropped
            let normalized = if text.ends_with('.') {
                format!("{text}0")
            } else {
                text.to_string()
            };
            normalized.parse::<f64>().ok().map(Operand::Real)
        } else {
            text.parse::<i64>().ok().map(Operand::Integer)
        }
    }

    fn name(&mut self) -> String {
        self.pos += 1; // '/'
        let mut bytes = Vec::new();
        while let Some(b) = self.peek() {
            if !is_regular(b) {
                break;
            }
            if b == b'#' {
                if let (Some(h), Some(l)) = (
                    self.peek_at(1).and_then(hex_value),
                    self.peek_at(2).and_then(hex_value),
                ) {
                    bytes.push(h << 4 | l);
                    self.pos += 3;
                    continue;
                }
            }
            bytes.push(b);
            self.pos += 1;
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn literal_string(&mut self) -> Vec<u8> {
        self.pos += 1; // '('
        let mut out = Vec::new();
        let mut depth = 1usize;
        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    out.push(b);
                }
                b'\\' => self.escape(&mut out),
                _ => out.push(b),
            }
        }
        out
    }

    fn escape(&mut self, out: &mut Vec<u8>) {
        let Some(b) = self.peek() else {
            return;
        };
        self.pos += 1;
        match b {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'0'..=b'7' => {
                let mut value = u32::from(b - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                out.push((value & 0xff) as u8);
            }
            // line continuation
            b'\r' => {
                if self.peek() == Some(b'\n') {
                    self.pos += 1;
                }
            }
            b'\n' => {}
            // \( \) \\ and unknown escapes keep the character
            other => out.push(other),
        }
    }

    fn hex_string(&mut self) -> Vec<u8> {
        self.pos += 1; // '<'
        let mut digits = Vec::new();
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'>' {
                break;
            }
            if let Some(v) = hex_value(b) {
                digits.push(v);
            }
        }
        if digits.len() % 2 == 1 {
            digits.push(0);
        }
        digits.chunks(2).map(|p| p[0] << 4 | p[1]).collect()
    }

    fn array(&mut self) -> Result<Vec<Operand>, BackendError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                None => {
                    return Err(BackendError::Interpreter(
                        "unterminated array in content stream".to_string(),
                    ));
                }
                Some(b']') => {
                    self.pos += 1;
                    return Ok(items);
                }
                _ => {
                    if let Some(Token::Operand(o)) = self.next_token()? {
                        items.push(o);
                    }
                }
            }
        }
    }

    fn dictionary(&mut self) -> Result<Vec<(String, Operand)>, BackendError> {
        let mut entries = Vec::new();
        let mut pending_key: Option<String> = None;
        loop {
            self.skip_whitespace_and_comments();
            match (self.peek(), self.peek_at(1)) {
                (None, _) => {
                    return Err(BackendError::Interpreter(
                        "unterminated dictionary in content stream".to_string(),
                    ));
                }
                (Some(b'>'), Some(b'>')) => {
                    self.pos += 2;
                    return Ok(entries);
                }
                _ => match (self.next_token()?, pending_key.take()) {
                    (Some(Token::Operand(value)), Some(key)) => entries.push((key, value)),
                    (Some(Token::Operand(Operand::Name(key))), None) => pending_key = Some(key),
                    _ => {}
                },
            }
        }
    }

    /// Skip from after `BI` to after the matching `EI`.
    fn skip_inline_image(&mut self) -> Result<(), BackendError> {
        // dictionary part, up to the ID keyword
        loop {
            match self.next_token()? {
                None => return Ok(()),
                Some(Token::Keyword(k)) if k == "ID" => break,
                Some(_) => {}
            }
        }
        // a single whitespace byte separates ID from the data
        if self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }
        while self.pos < self.input.len() {
            let at_ei = self.input[self.pos..].starts_with(b"EI")
                && (self.pos == 0 || is_whitespace(self.input[self.pos - 1]))
                && self.peek_at(2).is_none_or(|b| !is_regular(b));
            if at_ei {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }
        Ok(())
    }
}

/// Parse content stream bytes into a sequence of operators.
///
/// # Errors
///
/// Returns [`BackendError::Interpreter`] when an array or dictionary is cut
/// off by the end of the stream.
pub fn tokenize(input: &[u8]) -> Result<Vec<Operator>, BackendError> {
    let mut lexer = Lexer::new(input);
    let mut ops = Vec::new();
    let mut operands = Vec::new();
    while let Some(token) = lexer.next_token()? {
        match token {
            Token::Operand(o) => operands.push(o),
            Token::Keyword(k) if k == "BI" => {
                lexer.skip_inline_image()?;
                operands.clear();
            }
            Token::Keyword(name) => ops.push(Operator {
                name,
                operands: std::mem::take(&mut operands),
            }),
            Token::Stray => {}
        }
    }
    Ok(ops)
}
