//! Parser errors.

use std::fmt;

use fen_diagnostic::{Diagnostic, ErrorCode};
use fen_ir::Span;

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// A specific token or construct was required.
    #[error("expected {expected}, got {found}")]
    Expected { expected: String, found: String },

    /// A token that no rule can start with.
    #[error("unexpected '{found}'")]
    Unexpected { found: String },

    /// Input after the last top-level binding.
    #[error("unexpected trailing '{found}'")]
    Trailing { found: String },

    /// `(a, b, ...)` — the tuple syntax is reserved but unsupported.
    #[error("tuples unsupported")]
    TuplesUnsupported,

    /// `let` at the top level is reserved but unsupported.
    #[error("unable to parse global constant")]
    GlobalConstant,
}

/// A spanned parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError { kind, span }
    }

    /// Convert to a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self.kind {
            ParseErrorKind::Expected { .. } => ErrorCode::E1001,
            ParseErrorKind::Unexpected { .. } => ErrorCode::E1002,
            ParseErrorKind::Trailing { .. } => ErrorCode::E1003,
            ParseErrorKind::TuplesUnsupported => ErrorCode::E1004,
            ParseErrorKind::GlobalConstant => ErrorCode::E1005,
        };
        Diagnostic::error(code, self.kind.to_string()).with_label(self.span, "")
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for ParseError {}
