//! Lexer - source text to tokens
//!
//! `next_token` is a pure function of `(source, cursor)`: it classifies by the
//! first character, consumes one token, and returns the new cursor. `tokenize`
//! drives it until `Eof` or `Unexpected`.

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::executor::errors::{self, Fault};

/* ===================== Spans ===================== */

/// Byte range of a token in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct Span {
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// 1-based line number of the span start
    pub fn line_in(&self, source: &str) -> usize {
        line_at(source, self.start)
    }
}

pub fn line_at(source: &str, offset: usize) -> usize {
    let offset = offset.min(source.len());
    source.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

/* ===================== Tokens ===================== */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Semicolon,
    Comma,
    Identifier,
    Keyword,
    String,
    Number,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Equal,
    EqEq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
    Not,
    Dot,
    Unexpected,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Keyword {
    If,
    Else,
    For,
    In,
    While,
    Func,
    Return,
    End,
    True,
    False,
}

const KEYWORDS: &[(&str, Keyword)] = &[
    ("IF", Keyword::If),
    ("ELSE", Keyword::Else),
    ("FOR", Keyword::For),
    ("IN", Keyword::In),
    ("WHILE", Keyword::While),
    ("FUNC", Keyword::Func),
    ("RETURN", Keyword::Return),
    ("END", Keyword::End),
    ("TRUE", Keyword::True),
    ("FALSE", Keyword::False),
];

impl Keyword {
    /// Exact match only: `ENDING` is an identifier, not `END`
    pub fn lookup(word: &str) -> Option<Keyword> {
        KEYWORDS
            .iter()
            .find(|(text, _)| *text == word)
            .map(|(_, kw)| *kw)
    }

    pub fn as_str(&self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, kw)| kw == self)
            .map(|(text, _)| *text)
            .unwrap_or("?")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub keyword: Option<Keyword>,
    pub span: Span,
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Token {
            kind,
            keyword: None,
            span: Span::new(start, end),
        }
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Keyword && self.keyword == Some(kw)
    }
}

/* ===================== Scanning ===================== */

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Skip whitespace and `#` comments
fn skip_trivia(bytes: &[u8], mut cursor: usize) -> usize {
    loop {
        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        if cursor < bytes.len() && bytes[cursor] == b'#' {
            while cursor < bytes.len() && bytes[cursor] != b'\n' {
                cursor += 1;
            }
            continue;
        }
        return cursor;
    }
}

/// `AND` / `OR` as whole words, checked before the identifier path
fn match_word_operator(bytes: &[u8], cursor: usize) -> Option<(TokenKind, usize)> {
    for (word, kind) in [(&b"AND"[..], TokenKind::And), (&b"OR"[..], TokenKind::Or)] {
        let end = cursor + word.len();
        if bytes.len() >= end
            && &bytes[cursor..end] == word
            && (end == bytes.len() || !is_ident_char(bytes[end]))
        {
            return Some((kind, end));
        }
    }
    None
}

type Scanned = Result<(Token, usize), Fault>;

/// Scan one token starting at `cursor`
///
/// Returns the token and the cursor just past it.
pub fn next_token(source: &str, cursor: usize) -> Scanned {
    let bytes = source.as_bytes();
    let start = skip_trivia(bytes, cursor);

    let Some(&c) = bytes.get(start) else {
        return Ok((Token::new(TokenKind::Eof, start, start), start));
    };

    let single = |kind: TokenKind| -> Scanned { Ok((Token::new(kind, start, start + 1), start + 1)) };
    let double = |kind: TokenKind| -> Scanned { Ok((Token::new(kind, start, start + 2), start + 2)) };
    let followed_by = |b: u8| bytes.get(start + 1) == Some(&b);

    match c {
        b';' => single(TokenKind::Semicolon),
        b',' => single(TokenKind::Comma),
        b'+' => single(TokenKind::Plus),
        b'-' => single(TokenKind::Minus),
        b'*' => single(TokenKind::Star),
        b'/' => single(TokenKind::Slash),
        b'(' => single(TokenKind::LParen),
        b')' => single(TokenKind::RParen),
        b'.' => single(TokenKind::Dot),
        b'=' if followed_by(b'=') => double(TokenKind::EqEq),
        b'=' => single(TokenKind::Equal),
        b'!' if followed_by(b'=') => double(TokenKind::Neq),
        b'!' => single(TokenKind::Not),
        b'<' if followed_by(b'=') => double(TokenKind::Lte),
        b'<' => single(TokenKind::Lt),
        b'>' if followed_by(b'=') => double(TokenKind::Gte),
        b'>' => single(TokenKind::Gt),

        b'"' => {
            let mut end = start + 1;
            while end < bytes.len() && bytes[end] != b'"' {
                end += 1;
            }
            if end >= bytes.len() {
                return Err(Fault::compile(
                    errors::UNTERMINATED_STRING,
                    line_at(source, start),
                    "Unterminated string literal",
                ));
            }
            Ok((Token::new(TokenKind::String, start, end + 1), end + 1))
        }

        c if c.is_ascii_digit() => {
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            Ok((Token::new(TokenKind::Number, start, end), end))
        }

        c if is_ident_start(c) => {
            if let Some((kind, end)) = match_word_operator(bytes, start) {
                return Ok((Token::new(kind, start, end), end));
            }

            let mut end = start;
            while end < bytes.len() && is_ident_char(bytes[end]) {
                end += 1;
            }
            let mut token = Token::new(TokenKind::Identifier, start, end);
            if let Some(kw) = Keyword::lookup(&source[start..end]) {
                token.kind = TokenKind::Keyword;
                token.keyword = Some(kw);
            }
            Ok((token, end))
        }

        _ => {
            // Consume the whole character so the span stays on a char boundary
            let width = source[start..].chars().next().map_or(1, char::len_utf8);
            Ok((Token::new(TokenKind::Unexpected, start, start + width), start + width))
        }
    }
}

/// Scan the whole source; the last token is always `Eof` or `Unexpected`
pub fn tokenize(source: &str) -> Result<Vec<Token>, Fault> {
    let mut tokens = Vec::new();
    let mut cursor = 0;
    loop {
        let (token, next) = next_token(source, cursor)?;
        tokens.push(token);
        cursor = next;
        if matches!(token.kind, TokenKind::Eof | TokenKind::Unexpected) {
            return Ok(tokens);
        }
    }
}
