//! Fen CLI library: command implementations behind the `fen` binary.

pub mod commands;
pub mod reporting;
