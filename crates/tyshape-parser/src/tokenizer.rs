//! Tokenizer for type annotations.
//!
//! Words keep their hyphens and namespace separators (`non-empty-string`,
//! `\Foo\Bar`), so keyword recognition happens later against the reserved
//! word table. A `-` directly before a digit starts a negative number.

use tracing::trace;
use tyshape_common::ByteSpan;

use crate::errors::TypeParseError;

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// Identifier, keyword or (possibly qualified) class name.
    Word(String),
    /// `$name`, accepted after callable parameter types.
    Variable(String),
    Int(i64),
    Float(f64),
    /// Quoted string with escapes already applied.
    String(String),
    LessThan,
    GreaterThan,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    Bar,
    Ampersand,
    Question,
    Colon,
    DoubleColon,
    Equals,
    Ellipsis,
    EndOfInput,
}

impl TokenKind {
    /// Short description used in "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Word(word) => format!("`{word}`"),
            TokenKind::Variable(name) => format!("`${name}`"),
            TokenKind::Int(value) => format!("`{value}`"),
            TokenKind::Float(value) => format!("`{value}`"),
            TokenKind::String(_) => "string literal".to_string(),
            TokenKind::EndOfInput => "end of input".to_string(),
            other => format!("`{}`", other.punctuation()),
        }
    }

    fn punctuation(&self) -> &'static str {
        match self {
            TokenKind::LessThan => "<",
            TokenKind::GreaterThan => ">",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Bar => "|",
            TokenKind::Ampersand => "&",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::DoubleColon => "::",
            TokenKind::Equals => "=",
            TokenKind::Ellipsis => "...",
            _ => "",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: ByteSpan,
}

pub struct TypeTokenizer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> TypeTokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        TypeTokenizer { source, pos: 0 }
    }

    /// Tokenize the whole input. The last token is always `EndOfInput`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, TypeParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::EndOfInput;
            tokens.push(token);
            if done {
                break;
            }
        }
        trace!(count = tokens.len(), "tokenized type annotation");
        Ok(tokens)
    }

    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + ahead).copied()
    }

    fn span_from(&self, start: usize) -> ByteSpan {
        ByteSpan::new(start as u32, self.pos as u32)
    }

    fn next_token(&mut self) -> Result<Token, TypeParseError> {
        while self.peek_byte(0).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }

        let start = self.pos;
        let Some(byte) = self.peek_byte(0) else {
            return Ok(Token {
                kind: TokenKind::EndOfInput,
                span: ByteSpan::at(start as u32),
            });
        };

        let single = match byte {
            b'<' => Some(TokenKind::LessThan),
            b'>' => Some(TokenKind::GreaterThan),
            b'{' => Some(TokenKind::OpenBrace),
            b'}' => Some(TokenKind::CloseBrace),
            b'(' => Some(TokenKind::OpenParen),
            b')' => Some(TokenKind::CloseParen),
            b'[' => Some(TokenKind::OpenBracket),
            b']' => Some(TokenKind::CloseBracket),
            b',' => Some(TokenKind::Comma),
            b'|' => Some(TokenKind::Bar),
            b'&' => Some(TokenKind::Ampersand),
            b'?' => Some(TokenKind::Question),
            b'=' => Some(TokenKind::Equals),
            _ => None,
        };
        if let Some(kind) = single {
            self.pos += 1;
            return Ok(Token {
                kind,
                span: self.span_from(start),
            });
        }

        let kind = match byte {
            b':' if self.peek_byte(1) == Some(b':') => {
                self.pos += 2;
                TokenKind::DoubleColon
            }
            b':' => {
                self.pos += 1;
                TokenKind::Colon
            }
            b'.' if self.peek_byte(1) == Some(b'.') && self.peek_byte(2) == Some(b'.') => {
                self.pos += 3;
                TokenKind::Ellipsis
            }
            b'\'' | b'"' => TokenKind::String(self.scan_string(byte)?),
            b'$' => {
                self.pos += 1;
                let name_start = self.pos;
                self.scan_word_tail();
                if self.pos == name_start {
                    return Err(TypeParseError::syntax(
                        self.span_from(start),
                        "expected a variable name after `$`",
                    ));
                }
                TokenKind::Variable(self.source[name_start..self.pos].to_string())
            }
            b'-' if self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()) => self.scan_number()?,
            b'0'..=b'9' => self.scan_number()?,
            _ if is_word_start(byte) => {
                self.pos += 1;
                self.scan_word_tail();
                TokenKind::Word(self.source[start..self.pos].to_string())
            }
            _ => {
                let ch = self.source[start..].chars().next().unwrap_or('?');
                return Err(TypeParseError::syntax(
                    ByteSpan::new(start as u32, (start + ch.len_utf8()) as u32),
                    format!("unexpected character `{ch}`"),
                ));
            }
        };

        Ok(Token {
            kind,
            span: self.span_from(start),
        })
    }

    fn scan_word_tail(&mut self) {
        while let Some(byte) = self.peek_byte(0) {
            let hyphen_joins = byte == b'-' && self.peek_byte(1).is_some_and(is_word_start);
            if is_word_part(byte) || hyphen_joins {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn scan_number(&mut self) -> Result<TokenKind, TypeParseError> {
        let start = self.pos;
        if self.peek_byte(0) == Some(b'-') {
            self.pos += 1;
        }
        let mut is_float = false;
        while let Some(byte) = self.peek_byte(0) {
            match byte {
                b'0'..=b'9' | b'_' => self.pos += 1,
                b'.' if !is_float && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()) => {
                    is_float = true;
                    self.pos += 1;
                }
                b'e' | b'E'
                    if self.peek_byte(1).is_some_and(|b| b.is_ascii_digit())
                        || (matches!(self.peek_byte(1), Some(b'+' | b'-'))
                            && self.peek_byte(2).is_some_and(|b| b.is_ascii_digit())) =>
                {
                    is_float = true;
                    self.pos += 2;
                }
                _ => break,
            }
        }

        let text: String = self.source[start..self.pos]
            .chars()
            .filter(|ch| *ch != '_')
            .collect();
        let span = self.span_from(start);
        if is_float {
            let value = text
                .parse::<f64>()
                .map_err(|_| TypeParseError::syntax(span, format!("invalid float literal `{text}`")))?;
            if !value.is_finite() {
                return Err(TypeParseError::syntax(
                    span,
                    format!("float literal `{text}` is out of range"),
                ));
            }
            Ok(TokenKind::Float(value))
        } else {
            text.parse::<i64>().map(TokenKind::Int).map_err(|_| {
                TypeParseError::syntax(span, format!("integer literal `{text}` is out of range"))
            })
        }
    }

    /// Single quotes only unescape `\\` and `\'`; double quotes also know the
    /// usual control escapes.
    fn scan_string(&mut self, quote: u8) -> Result<String, TypeParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        let mut chars = self.source[self.pos..].char_indices();
        while let Some((offset, ch)) = chars.next() {
            if ch as u32 == quote as u32 {
                self.pos += offset + 1;
                return Ok(value);
            }
            if ch != '\\' {
                value.push(ch);
                continue;
            }
            let Some((_, escaped)) = chars.next() else {
                break;
            };
            match (quote, escaped) {
                (_, '\\') => value.push('\\'),
                (b'\'', '\'') => value.push('\''),
                (b'"', '"') => value.push('"'),
                (b'"', 'n') => value.push('\n'),
                (b'"', 't') => value.push('\t'),
                (b'"', 'r') => value.push('\r'),
                (_, other) => {
                    value.push('\\');
                    value.push(other);
                }
            }
        }
        self.pos = self.source.len();
        Err(TypeParseError::syntax(
            self.span_from(start),
            "unterminated string literal",
        ))
    }
}

fn is_word_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b'\\' || byte >= 0x80
}

fn is_word_part(byte: u8) -> bool {
    is_word_start(byte) || byte.is_ascii_digit()
}

/// Convenience wrapper around [`TypeTokenizer`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, TypeParseError> {
    TypeTokenizer::new(source).tokenize()
}

#[cfg(test)]
#[path = "tests/tokenizer_tests.rs"]
mod tests;
