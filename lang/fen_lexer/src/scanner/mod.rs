//! The scanner itself: a byte cursor over the source string.

use fen_ir::{SharedInterner, Span, Token, TokenKind, TokenList};
use memchr::memchr;

use crate::{LexError, LexErrorKind};

/// Lex a whole source string into a token list terminated by `Eof`.
pub fn lex(source: &str, interner: &SharedInterner) -> Result<TokenList, LexError> {
    let mut scanner = Scanner::new(source, interner);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(TokenList::new(tokens));
        }
    }
}

/// Symbol characters: what identifiers (and the tails of number literals)
/// are made of.
fn is_symbol(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'?' | b'@' | b'#')
}

/// Value of `b` as a digit in `base`, if it is one.
fn digit_value(b: u8, base: i64) -> Option<i64> {
    let value = match b.to_ascii_lowercase() {
        d @ b'0'..=b'9' => i64::from(d - b'0'),
        a @ b'a'..=b'z' => i64::from(a - b'a') + 10,
        _ => return None,
    };
    (value < base).then_some(value)
}

fn offset(pos: usize) -> u32 {
    match u32::try_from(pos) {
        Ok(v) => v,
        Err(_) => panic!("source file exceeds u32 offsets"),
    }
}

struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    interner: &'a SharedInterner,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str, interner: &'a SharedInterner) -> Self {
        Scanner {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            interner,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(offset(start), offset(self.pos))
    }

    /// Skip whitespace and `;` line comments.
    fn skip_trivia(&mut self) {
        loop {
            while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
                self.pos += 1;
            }
            if self.peek() == Some(b';') {
                self.pos = match memchr(b'\n', &self.bytes[self.pos..]) {
                    Some(nl) => self.pos + nl,
                    None => self.bytes.len(),
                };
            } else {
                return;
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia();

        let start = self.pos;
        let Some(first) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, self.span_from(start)));
        };

        if let Some(kind) = self.scan_sequence() {
            self.pos += 2;
            return Ok(Token::new(kind, self.span_from(start)));
        }

        if first.is_ascii_digit()
            || (first == b'.' && self.peek_at(1).is_some_and(|b| b.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if is_symbol(first) {
            return Ok(self.scan_word());
        }

        Ok(self.scan_single())
    }

    /// Two-character operator sequences.
    fn scan_sequence(&self) -> Option<TokenKind> {
        match (self.peek()?, self.peek_at(1)?) {
            (b'=', b'=') => Some(TokenKind::EqEq),
            (b'!', b'=') => Some(TokenKind::NotEq),
            (b'<', b'=') => Some(TokenKind::LessEq),
            (b'>', b'=') => Some(TokenKind::GreaterEq),
            (b'=', b'>') => Some(TokenKind::FatArrow),
            (b'+', b'+') => Some(TokenKind::PlusPlus),
            _ => None,
        }
    }

    /// Integer (decimal or `0x` hex) or base-10 real.
    ///
    /// The whole symbol run must be digits of the base: `123abc` is an
    /// invalid-digit error, not a number followed by an identifier.
    fn scan_number(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let mut base = 10;
        let mut value: i64 = 0;
        let mut required = false;

        if self.bytes[self.pos..].starts_with(b"0x") {
            base = 16;
            self.pos += 2;
            required = true;
        }

        while required || self.peek().is_some_and(is_symbol) {
            required = false;
            let digit = self
                .peek()
                .and_then(|b| digit_value(b, base))
                .ok_or_else(|| self.invalid_digit())?;
            value = value.wrapping_mul(base).wrapping_add(digit);
            self.pos += 1;
        }

        if base == 10 && self.peek() == Some(b'.') {
            self.pos += 1;
            let mut real = value as f64;
            let mut magnitude = 1.0f64;
            required = true;

            while required || self.peek().is_some_and(is_symbol) {
                required = false;
                let digit = self
                    .peek()
                    .and_then(|b| digit_value(b, 10))
                    .ok_or_else(|| self.invalid_digit())?;
                magnitude *= 10.0;
                real += digit as f64 / magnitude;
                self.pos += 1;
            }

            return Ok(Token::new(
                TokenKind::Real(real.to_bits()),
                self.span_from(start),
            ));
        }

        Ok(Token::new(TokenKind::Int(value), self.span_from(start)))
    }

    fn invalid_digit(&self) -> LexError {
        let end = (self.pos + 1).min(self.bytes.len());
        LexError::new(
            LexErrorKind::InvalidDigit,
            Span::new(offset(self.pos), offset(end)),
        )
    }

    /// Identifier or keyword.
    fn scan_word(&mut self) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(is_symbol) {
            self.pos += 1;
        }
        let word = &self.source[start..self.pos];
        let kind = TokenKind::keyword(word)
            .unwrap_or_else(|| TokenKind::Ident(self.interner.intern(word)));
        Token::new(kind, self.span_from(start))
    }

    /// Single-character tokens, including `Unknown` for anything the
    /// language has no use for.
    fn scan_single(&mut self) -> Token {
        let start = self.pos;
        // Advance one whole character, not one byte.
        let c = self.source[self.pos..].chars().next().unwrap_or('\0');
        self.pos += c.len_utf8();

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '=' => TokenKind::Equals,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '<' => TokenKind::Less,
            '>' => TokenKind::Greater,
            other => TokenKind::Unknown(other),
        };
        Token::new(kind, self.span_from(start))
    }
}
