//! Token cursor.

use fen_ir::{SharedInterner, Span, Token, TokenKind, TokenList};

use crate::{ParseError, ParseErrorKind};

/// A position in the token stream with the usual peek/advance/eat helpers.
pub(crate) struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
    interner: &'a SharedInterner,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a TokenList, interner: &'a SharedInterner) -> Self {
        Cursor {
            tokens,
            pos: 0,
            interner,
        }
    }

    /// The current token. Reading past the end yields `Eof`.
    pub(crate) fn current(&self) -> Token {
        self.tokens.get(self.pos)
    }

    pub(crate) fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn span(&self) -> Span {
        self.current().span
    }

    pub(crate) fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Consume `expected` or fail with an expected-token error.
    pub(crate) fn eat(&mut self, expected: TokenKind) -> Result<(), ParseError> {
        if self.kind() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.expected(&format!("'{}'", expected.describe())))
        }
    }

    /// Consume an identifier, returning its name and span.
    pub(crate) fn eat_ident(&mut self) -> Result<(fen_ir::Name, Span), ParseError> {
        match self.kind() {
            TokenKind::Ident(name) => {
                let span = self.span();
                self.advance();
                Ok((name, span))
            }
            _ => Err(self.expected("'#identifier'")),
        }
    }

    /// An expected-X-got-Y error at the current token.
    pub(crate) fn expected(&self, what: &str) -> ParseError {
        ParseError::new(
            ParseErrorKind::Expected {
                expected: what.to_owned(),
                found: self.current().describe(self.interner),
            },
            self.span(),
        )
    }

    /// An unexpected-token error at the current token.
    pub(crate) fn unexpected(&self) -> ParseError {
        ParseError::new(
            ParseErrorKind::Unexpected {
                found: self.current().describe(self.interner),
            },
            self.span(),
        )
    }

    pub(crate) fn interner(&self) -> &SharedInterner {
        self.interner
    }
}
