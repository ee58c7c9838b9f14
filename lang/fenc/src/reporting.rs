//! Diagnostic reporting to stderr.

use fen_diagnostic::Diagnostic;

/// Render a diagnostic against its source and print it to stderr.
pub fn report(diag: &Diagnostic, source: &str, filename: &str) {
    eprint!("{}", fen_diagnostic::render(diag, source, filename));
}
