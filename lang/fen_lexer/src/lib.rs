//! Fen Lexer - scanner for Fen source text.
//!
//! Turns a source string into a [`TokenList`](fen_ir::TokenList). The token
//! grammar:
//!
//! - identifiers: `[A-Za-z0-9_?@#]+`, not starting with a digit
//! - integers: decimal or `0x` hexadecimal
//! - reals: base-10 with a `.` (`12.5`, also `.5`)
//! - two-character sequences: `==` `!=` `<=` `>=` `=>` `++`
//! - keywords: `fn let match in if then else _ true false`
//! - `;` starts a comment running to end of line
//!
//! Any other character is surfaced as an `Unknown` token for the parser to
//! reject with a source position attached.

mod lex_error;
mod scanner;

pub use lex_error::{LexError, LexErrorKind};
pub use scanner::lex;
