//! Fen Diagnostic - structured diagnostics and error reporting.
//!
//! This crate defines the diagnostic types shared by the lexer, parser and
//! evaluator, plus a plain-text emitter that renders a diagnostic against
//! its source file (offending line + caret).

mod diagnostic;
mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use emitter::render;
pub use error_code::ErrorCode;
