//! Fen IR - core data types for the Fen interpreter.
//!
//! This crate contains the data structures shared by the lexer, parser and
//! evaluator:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Tokens and `TokenList` for lexer output
//! - Expression nodes and the flattened `ExprArena`
//!
//! # Design Philosophy
//!
//! - **Intern everything**: identifiers become `Name(u32)`
//! - **Flatten everything**: no `Box<Expr>`, expressions are `ExprId(u32)`
//!   indices into an arena; argument and parameter lists are ranges into
//!   flat side arrays
//!
//! Types that contain floats store them as `u64` bits so every node stays
//! `Copy + Eq + Hash`.

mod arena;
mod ast;
mod interner;
mod name;
mod span;
mod token;

pub use arena::{ExprArena, ExprId, ExprRange, NameRange, SharedArena};
pub use ast::{Binding, Expr, ExprKind, Module};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;
pub use token::{Token, TokenKind, TokenList};
