//! Lexer errors.

use std::fmt;

use fen_diagnostic::{Diagnostic, ErrorCode};
use fen_ir::Span;

/// What went wrong while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    /// A number literal contains a character that is not a digit of its
    /// base (covers `0xZZ`, `12q`, `1.x` and friends).
    #[error("invalid digit in number literal")]
    InvalidDigit,
}

/// A spanned lexer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { kind, span }
    }

    /// Convert to a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self.kind {
            LexErrorKind::InvalidDigit => ErrorCode::E0001,
        };
        Diagnostic::error(code, self.kind.to_string()).with_label(self.span, "")
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for LexError {}
